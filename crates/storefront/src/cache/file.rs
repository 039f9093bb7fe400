//! Directory-backed local cache.

use std::path::PathBuf;

use tracing::{debug, warn};
use url::form_urlencoded;

use super::{CacheError, LocalCache};

/// [`LocalCache`] that keeps each key in its own JSON file.
///
/// File names are the form-urlencoded key, so distinct keys always map to
/// distinct files and no key can name a path outside the directory. Writes go
/// to a temporary file first and are then renamed over the target so readers
/// never see a partial value.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut name: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        // Leading dots would hide the file.
        if name.starts_with('.') {
            name.replace_range(..1, "%2E");
        }
        self.dir.join(format!("{name}.json"))
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read cache file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let io_err = |source: std::io::Error| CacheError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;

        debug!(path = %path.display(), "Wrote cache file");
        Ok(())
    }
}
