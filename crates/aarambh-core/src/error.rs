//! Error types for `aarambh-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("achievement not found: {0}")]
  AchievementNotFound(Uuid),

  #[error("progress increment out of range: {0}")]
  InvalidPoints(i64),

  #[error("invalid calendar event: {0}")]
  InvalidEvent(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
