//! Error type for `beck-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] beck_core::Error),

  /// The backing engine rejected a statement.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The backing file could not be opened or created.
  #[error("could not open store at {}: {source}", .path.display())]
  Open {
    path:   PathBuf,
    #[source]
    source: tokio_rusqlite::Error,
  },

  #[error("could not seed store at {}: {source}", .path.display())]
  Seed {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The insert statement and the bound values disagree on arity. This is a
  /// programming error, not a runtime database failure.
  #[error("schema mismatch: statement expects {expected} values, got {actual}")]
  SchemaMismatch { expected: usize, actual: usize },

  #[error("store is closed")]
  Closed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
