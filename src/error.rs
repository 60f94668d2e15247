use std::path::PathBuf;
use thiserror::Error;

/// Failures coming out of the product store.
///
/// UI actions never show these to the user verbatim; they are logged and
/// replaced with a generic message.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened (missing directory, permissions).
    #[error("could not open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed to prepare or execute.
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// The data directory could not be created.
    #[error("could not create data directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type DbResult<T> = Result<T, DbError>;
