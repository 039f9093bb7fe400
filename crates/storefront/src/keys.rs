//! Fish key generation.
//!
//! Keys take the form `fish-<suffix>`. Two strategies are available:
//!
//! - [`MonotonicKeys`] - `fish-<unix millis>`, bumped past the previously
//!   issued value so repeated or backwards clock readings never collide
//! - [`UuidKeys`] - `fish-<uuid v4>`, collision-resistant across clients

use catch_of_the_day_core::FishKey;
use chrono::Utc;
use uuid::Uuid;

/// Prefix shared by every generated key.
pub const KEY_PREFIX: &str = "fish-";

/// Source of new inventory keys.
pub trait KeyGenerator: Send {
    /// Produce a key that this generator has never produced before.
    fn next_key(&mut self) -> FishKey;
}

/// Millisecond timestamp keys, strictly increasing per generator.
pub struct MonotonicKeys {
    clock: Box<dyn Fn() -> i64 + Send>,
    last: Option<i64>,
}

impl MonotonicKeys {
    /// Keys from the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(|| Utc::now().timestamp_millis())
    }

    /// Keys from a custom millisecond clock.
    #[must_use]
    pub fn with_clock(clock: impl Fn() -> i64 + Send + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            last: None,
        }
    }
}

impl Default for MonotonicKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyGenerator for MonotonicKeys {
    fn next_key(&mut self) -> FishKey {
        let now = (self.clock)();
        let millis = match self.last {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last = Some(millis);
        FishKey::new(format!("{KEY_PREFIX}{millis}"))
    }
}

/// Random UUID keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidKeys;

impl KeyGenerator for UuidKeys {
    fn next_key(&mut self) -> FishKey {
        FishKey::new(format!("{KEY_PREFIX}{}", Uuid::new_v4()))
    }
}

/// Which key generator a container uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// [`MonotonicKeys`].
    #[default]
    Timestamp,
    /// [`UuidKeys`].
    Uuid,
}

impl KeyStrategy {
    /// Build a fresh generator for this strategy.
    #[must_use]
    pub fn generator(self) -> Box<dyn KeyGenerator> {
        match self {
            Self::Timestamp => Box::new(MonotonicKeys::new()),
            Self::Uuid => Box::new(UuidKeys),
        }
    }
}

impl std::str::FromStr for KeyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timestamp" => Ok(Self::Timestamp),
            "uuid" => Ok(Self::Uuid),
            _ => Err(format!("invalid key strategy: {s} (expected timestamp or uuid)")),
        }
    }
}
