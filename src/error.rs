//! Fatal error taxonomy
//!
//! Non-fatal conditions (stale branches, unverifiable local repositories,
//! unmigratable URLs) are logged as warnings and never surface here.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required CLI argument is missing or invalid.
    #[error("argument error: {0}")]
    Argument(String),

    /// One legacy settings table is malformed or ambiguous. Recovered by
    /// skipping the entry; only reported as a fatal error if promoted by a
    /// caller that cannot continue without it.
    #[error("invalid game settings entry: {0}")]
    ConfigEntry(String),

    /// Application-data directories or output files cannot be created.
    #[error("cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The masterlist download failed. A masterlist left behind by a
    /// previous successful run stays untouched on disk.
    #[error("masterlist download from {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// The persisted load order file could not be opened at all.
    #[error("cannot read load order file {path}: {source}")]
    OrderFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
