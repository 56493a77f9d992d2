//! Error types for `beck-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("item score {0} is outside the range 0..=3")]
  ScoreOutOfRange(i64),

  #[error("expected {expected} item scores, got {actual}")]
  ItemCount { expected: usize, actual: usize },

  #[error("invalid date {0:?}, expected yyyy-MM-dd")]
  Date(String),

  #[error("invalid time {0:?}, expected hh:mm:ss")]
  Time(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
