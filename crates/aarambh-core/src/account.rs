//! Accounts and profiles.
//!
//! An account is the login identity; a profile carries the public display name
//! and the aggregate achievement totals shown on the leaderboard. Both share
//! the same `user_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub user_id:    Uuid,
  /// Always stored lower-cased.
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// An account together with its stored PHC password hash. Never serialised.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub account:       Account,
  pub password_hash: String,
}

/// Input to [`crate::store::PlatformStore::create_account`].
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub email:         String,
  pub password_hash: String,
  pub full_name:     String,
}

/// Per-user aggregate. `total_points` and `achievement_count` only change as a
/// side effect of an award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id:           Uuid,
  pub full_name:         String,
  pub total_points:      i64,
  pub achievement_count: i64,
  pub updated_at:        DateTime<Utc>,
}

/// The subset of a profile exposed on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
  pub user_id:           Uuid,
  pub full_name:         String,
  pub total_points:      i64,
  pub achievement_count: i64,
}

/// Normalise an e-mail address for storage and lookup.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// A loose check: one `@` with something on either side.
pub fn is_plausible_email(email: &str) -> bool {
  match email.trim().split_once('@') {
    Some((local, domain)) => {
      !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    }
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_normalisation() {
    assert_eq!(normalize_email("  Asha@Example.ORG "), "asha@example.org");
  }

  #[test]
  fn email_plausibility() {
    assert!(is_plausible_email("asha@example.org"));
    assert!(!is_plausible_email("asha.example.org"));
    assert!(!is_plausible_email("@example.org"));
    assert!(!is_plausible_email("asha@"));
    assert!(!is_plausible_email("a@b@c"));
  }
}
