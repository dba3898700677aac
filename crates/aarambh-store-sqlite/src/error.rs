//! Error type for `aarambh-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A limit too large to bind as an SQLite integer.
  #[error("limit out of range: {0}")]
  LimitOutOfRange(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
