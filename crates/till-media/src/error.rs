//! # Media Error Types

use std::path::PathBuf;

use thiserror::Error;

/// Artifact storage errors.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The storage root could not be created or is not a directory.
    ///
    /// ## When This Occurs
    /// - `MEDIA_ROOT` points at a file
    /// - Missing permissions on a parent directory
    #[error("Media root {path} unusable: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing an artifact failed.
    ///
    /// ## When This Occurs
    /// - Disk full
    /// - Permissions changed under a running server
    #[error("I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl MediaError {
    pub(crate) fn io(name: &str, source: std::io::Error) -> Self {
        MediaError::Io {
            name: name.to_string(),
            source,
        }
    }
}

/// Result type for artifact storage.
pub type MediaResult<T> = Result<T, MediaError>;
