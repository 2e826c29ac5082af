//! Crate-wide error type.
//!
//! Every fallible public operation returns [`Error`] synchronously at its
//! call site. Failures inside asynchronous dispatch (a panicking callback,
//! a failed file write) are deliberately absent here: the producer has
//! already moved on, so those are isolated at the dispatch boundary and
//! reported through the `tracing` facade instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::backend::registry::SinkHandle;

/// Errors surfaced by the logger's public operations.
#[derive(Debug, Error)]
pub enum Error {
    /// `log` was called with a zero-length message.
    #[error("cannot log an empty message")]
    EmptyMessage,

    /// The logger has begun shutdown; no further records or registrations
    /// are accepted.
    #[error("logger is shutting down")]
    ShuttingDown,

    /// A file sink's path could not be opened for append at registration.
    #[error("failed to open log file {path:?} for append")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The handle is unknown or was already unregistered.
    #[error("sink handle not found: {0}")]
    HandleNotFound(SinkHandle),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert!(
            Error::EmptyMessage
                .to_string()
                .contains("empty message")
        );
        assert!(
            Error::HandleNotFound(SinkHandle::from_raw(3))
                .to_string()
                .contains("not found")
        );
    }

    #[test]
    fn test_file_open_preserves_source() {
        let err = Error::FileOpen {
            path: PathBuf::from("/no/such/dir/x.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
    }
}
