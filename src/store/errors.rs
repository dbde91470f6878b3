//! Store error types.
//!
//! Only infrastructural failures are errors here. A missing record is a
//! normal outcome: `get`/`update` return `Option` and `delete` returns
//! `bool`, so callers must check explicitly rather than catch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Disk I/O failure reading or writing the backing file
    #[error("storage I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Backing file exists but does not parse as a record set
    #[error("corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Operation attempted after `close()`
    #[error("store is closed")]
    Closed,

    /// A previous panic poisoned the store lock
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_names_path() {
        let err = StoreError::io(
            "data/db.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let display = format!("{}", err);
        assert!(display.contains("storage I/O failure"));
        assert!(display.contains("data/db.json"));
    }

    #[test]
    fn test_closed_error_display() {
        assert_eq!(format!("{}", StoreError::Closed), "store is closed");
    }
}
