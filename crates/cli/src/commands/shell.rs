//! Interactive store shell.
//!
//! # Usage
//!
//! ```bash
//! cotd store gorgeous-smoky-trout
//! ```
//!
//! Reads one command per line:
//!
//! ```text
//! samples                                  load the demo inventory
//! add <name> <price-cents> <status> [desc] add a fish ("quote names" with spaces)
//! order <key>                              add one of a fish to the order
//! show                                     print the menu and order
//! help                                     list commands
//! quit                                     leave the store
//! ```
//!
//! # Environment Variables
//!
//! - `COTD_STORE_ID` - Store opened when no id is given
//! - `COTD_FIREBASE_URL` - Realtime database base URL (in-memory when unset)
//! - `COTD_CACHE_DIR` - Directory holding cached orders

use std::fmt;

use catch_of_the_day_core::{Fish, FishKey, FishStatus, Price, StoreId};
use catch_of_the_day_storefront::StoreStateContainer;
use catch_of_the_day_storefront::config::StorefrontConfig;
use catch_of_the_day_storefront::session::Session;
use catch_of_the_day_storefront::view::StoreView;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const HELP: &str = "\
Commands:
  samples                                   load the demo inventory
  add <name> <price-cents> <status> [desc]  add a fish (status: available, unavailable, sold-out)
  order <key>                               add one of a fish to the order
  show                                      print the menu and order
  help                                      list commands
  quit                                      leave the store
";

const ADD_USAGE: &str = "add <name> <price-cents> <status> [desc]";
const ORDER_USAGE: &str = "order <key>";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Samples,
    Add(Fish),
    Order(FishKey),
    Show,
    Help,
    Quit,
}

/// Why a shell line was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid price '{0}': expected whole cents, e.g. 1724")]
    InvalidPrice(String),

    #[error("{0}")]
    InvalidStatus(String),

    #[error("Unterminated quote")]
    UnterminatedQuote,
}

impl ShellCommand {
    /// Parse one input line. Blank lines parse to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands or malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let words = tokenize(line)?;
        let Some((command, args)) = words.split_first() else {
            return Ok(None);
        };

        let parsed = match (command.as_str(), args) {
            ("samples", []) => Self::Samples,
            ("show", []) => Self::Show,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            ("order", [key]) => Self::Order(FishKey::new(key.as_str())),
            ("order", _) => return Err(ParseError::Usage(ORDER_USAGE)),
            ("add", [name, price, status, rest @ ..]) if rest.len() <= 1 => {
                let cents: u32 = price
                    .parse()
                    .map_err(|_| ParseError::InvalidPrice(price.clone()))?;
                let status: FishStatus = status.parse().map_err(ParseError::InvalidStatus)?;
                let fish = Fish::new(name.as_str(), Price::from_cents(cents), status);
                match rest.first() {
                    Some(desc) => Self::Add(fish.with_desc(desc.as_str())),
                    None => Self::Add(fish),
                }
            }
            ("add", _) => return Err(ParseError::Usage(ADD_USAGE)),
            (other, _) => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Some(parsed))
    }
}

/// Split a line on whitespace, keeping double-quoted runs together.
fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(ParseError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Run the shell for `store_id` until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if the store id is invalid, no store id is available,
/// the session cannot be created, or the terminal cannot be read or written.
pub async fn run(
    store_id: Option<String>,
    config: StorefrontConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let store_id = match store_id {
        Some(id) => StoreId::parse(&id)?,
        None => config
            .default_store
            .clone()
            .ok_or("no store given; pass a store id or set COTD_STORE_ID")?,
    };

    let session = Session::new(config)?;
    let mut store = session.open(store_id);
    tracing::info!(store_id = %store.store_id(), "Store opened");

    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    out.write_all(
        format!(
            "Welcome to {}! Type 'help' for commands.\n",
            store.store_id()
        )
        .as_bytes(),
    )
    .await?;

    loop {
        out.write_all(b"> ").await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        store.process_sync_events();

        let reply = match ShellCommand::parse(&line) {
            Ok(None) => continue,
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => execute(&mut store, command),
            Err(e) => format!("{e}\n"),
        };
        out.write_all(reply.as_bytes()).await?;
    }

    store.dispose();
    out.write_all(b"Bye!\n").await?;
    out.flush().await?;
    Ok(())
}

/// Apply a command to the store and return the text to show.
fn execute(store: &mut StoreStateContainer, command: ShellCommand) -> String {
    match command {
        ShellCommand::Samples => {
            store.load_samples();
            Screen(&store.view()).to_string()
        }
        ShellCommand::Add(fish) => {
            let name = fish.name.clone();
            let key = store.add_fish(fish);
            format!("Added {name} as {key}\n")
        }
        ShellCommand::Order(key) => match store.fishes().get(&key) {
            None => format!("No fish with key {key}\n"),
            Some(fish) if !fish.status.is_orderable() => {
                format!("{} is {}\n", fish.name, fish.status.label())
            }
            Some(fish) => {
                let name = fish.name.clone();
                match store.add_to_order(key) {
                    Ok(quantity) => format!("{quantity} lbs {name} in your order\n"),
                    Err(e) => {
                        tracing::warn!(error = %e, "Order was not cached");
                        format!("Added {name}, but the order could not be saved: {e}\n")
                    }
                }
            }
        },
        ShellCommand::Show => Screen(&store.view()).to_string(),
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => String::new(),
    }
}

/// Text rendering of a [`StoreView`].
struct Screen<'a>(&'a StoreView);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;

        writeln!(f, "Catch of the Day - {} [{}]", view.store_id, view.sync)?;
        if view.sync.is_unavailable() {
            writeln!(f, "! Inventory may be out of date")?;
        }

        writeln!(f, "Menu:")?;
        if view.fishes.is_empty() {
            writeln!(f, "  (no fish yet - try 'samples')")?;
        }
        for fish in &view.fishes {
            writeln!(
                f,
                "  {:<10} {:<18} {:>8}  {}",
                fish.key,
                fish.name,
                fish.price,
                fish.status.label()
            )?;
            if !fish.desc.is_empty() {
                writeln!(f, "             {}", fish.desc)?;
            }
        }

        writeln!(f, "Your Order:")?;
        if view.order.is_empty() {
            writeln!(f, "  (empty)")?;
        }
        for line in &view.order.lines {
            writeln!(f, "  {line}")?;
        }
        writeln!(f, "Total: {}", view.order.total_display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use catch_of_the_day_storefront::cache::MemoryCache;
    use catch_of_the_day_storefront::sync::MemoryRemote;

    use super::*;

    fn store() -> StoreStateContainer {
        let mut store = StoreStateContainer::new(
            StoreId::parse("shop-1").unwrap(),
            Arc::new(MemoryRemote::new()),
            Arc::new(MemoryCache::new()),
        );
        store.initialize();
        store.process_sync_events();
        store
    }

    #[test]
    fn test_tokenize_quotes() {
        let words = tokenize(r#"add "Rainbow Trout" 1099  available "Fresh from the river""#)
            .unwrap();
        assert_eq!(
            words,
            vec![
                "add",
                "Rainbow Trout",
                "1099",
                "available",
                "Fresh from the river"
            ]
        );
        assert_eq!(
            tokenize(r#"add "Trout"#),
            Err(ParseError::UnterminatedQuote)
        );
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(ShellCommand::parse("").unwrap(), None);
        assert_eq!(
            ShellCommand::parse(" samples ").unwrap(),
            Some(ShellCommand::Samples)
        );
        assert_eq!(ShellCommand::parse("exit").unwrap(), Some(ShellCommand::Quit));
        assert_eq!(
            ShellCommand::parse("order fish3").unwrap(),
            Some(ShellCommand::Order(FishKey::from("fish3")))
        );
    }

    #[test]
    fn test_parse_add() {
        let parsed = ShellCommand::parse(r#"add Trout 1099 sold-out "Catch of the week""#)
            .unwrap()
            .unwrap();
        let expected = Fish::new("Trout", Price::from_cents(1099), FishStatus::SoldOut)
            .with_desc("Catch of the week");
        assert_eq!(parsed, ShellCommand::Add(expected));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            ShellCommand::parse("add Trout $10.99 available"),
            Err(ParseError::InvalidPrice("$10.99".to_string()))
        );
        assert!(matches!(
            ShellCommand::parse("add Trout 1099 frozen"),
            Err(ParseError::InvalidStatus(_))
        ));
        assert_eq!(
            ShellCommand::parse("add Trout"),
            Err(ParseError::Usage(ADD_USAGE))
        );
        assert_eq!(
            ShellCommand::parse("order"),
            Err(ParseError::Usage(ORDER_USAGE))
        );
        assert_eq!(
            ShellCommand::parse("sell fish1"),
            Err(ParseError::Unknown("sell".to_string()))
        );
    }

    #[test]
    fn test_execute_order_flow() {
        let mut store = store();
        execute(&mut store, ShellCommand::Samples);

        assert_eq!(
            execute(&mut store, ShellCommand::Order(FishKey::from("fish1"))),
            "1 lbs Pacific Halibut in your order\n"
        );
        assert_eq!(
            execute(&mut store, ShellCommand::Order(FishKey::from("fish1"))),
            "2 lbs Pacific Halibut in your order\n"
        );
        assert_eq!(
            execute(&mut store, ShellCommand::Order(FishKey::from("nope"))),
            "No fish with key nope\n"
        );

        let screen = execute(&mut store, ShellCommand::Show);
        assert!(screen.contains("2 lbs Pacific Halibut $34.48"));
        assert!(screen.contains("Total: $34.48"));
    }

    #[test]
    fn test_execute_refuses_sold_out() {
        let mut store = store();
        let reply = execute(
            &mut store,
            ShellCommand::Add(Fish::new(
                "Trout",
                Price::from_cents(1099),
                FishStatus::SoldOut,
            )),
        );
        let key = reply.trim().rsplit(' ').next().unwrap().to_string();

        assert_eq!(
            execute(&mut store, ShellCommand::Order(FishKey::new(key))),
            "Trout is Sold Out!\n"
        );
        assert!(store.order().is_empty());
    }

    #[test]
    fn test_screen_empty_store() {
        let store = store();
        let screen = Screen(&store.view()).to_string();
        assert!(screen.starts_with("Catch of the Day - shop-1 [live]"));
        assert!(screen.contains("(no fish yet"));
        assert!(screen.contains("Total: $0.00"));
        assert!(!screen.contains("out of date"));
    }
}
