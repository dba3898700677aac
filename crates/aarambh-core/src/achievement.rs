//! Achievement catalog entries, earned achievements, and progress counters.
//!
//! The catalog is static: entries are seeded out of band and never updated.
//! A user's standing is recorded in two places: a per-category progress
//! counter that only ever grows, and one award row per earned achievement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest single progress increment or catalog reward. Keeps running totals
/// far from the `i64` limit.
pub const MAX_POINTS: i64 = 1_000_000;

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// A named accomplishment that unlocks once a user's progress in `category`
/// reaches `required_points`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
  pub achievement_id:  Uuid,
  pub title:           String,
  pub description:     String,
  /// Icon identifier understood by the frontend, e.g. `"trophy"`.
  pub icon:            Option<String>,
  /// Grouping tag shared with [`UserProgress::category`], e.g. `"quiz"`.
  pub category:        String,
  /// Progress threshold at which the achievement is awarded.
  pub required_points: i64,
  /// Reward credited to the user's profile when the achievement is earned.
  pub points:          i64,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::store::PlatformStore::add_achievement`]; also the shape
/// of one entry in a catalog seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAchievement {
  pub title:           String,
  #[serde(default)]
  pub description:     String,
  #[serde(default)]
  pub icon:            Option<String>,
  pub category:        String,
  pub required_points: i64,
  pub points:          i64,
}

// ─── Awards ──────────────────────────────────────────────────────────────────

/// Marks that a user has earned an achievement. At most one exists per
/// `(user_id, achievement_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAchievement {
  pub user_achievement_id: Uuid,
  pub user_id:             Uuid,
  pub achievement_id:      Uuid,
  pub earned_at:           DateTime<Utc>,
}

/// An award joined with its catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnedAchievement {
  #[serde(flatten)]
  pub award:       UserAchievement,
  pub achievement: Achievement,
}

/// Result of [`crate::service::AchievementService::award_achievement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwardOutcome {
  /// The achievement was newly recorded and the profile credited.
  Awarded(UserAchievement),
  /// The user already held the achievement; nothing changed.
  AlreadyEarned(UserAchievement),
}

impl AwardOutcome {
  pub fn is_new(&self) -> bool { matches!(self, Self::Awarded(_)) }

  pub fn record(&self) -> &UserAchievement {
    match self {
      Self::Awarded(r) | Self::AlreadyEarned(r) => r,
    }
  }

  pub fn into_record(self) -> UserAchievement {
    match self {
      Self::Awarded(r) | Self::AlreadyEarned(r) => r,
    }
  }
}

// ─── Progress ────────────────────────────────────────────────────────────────

/// A user's running point total in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
  pub user_id:    Uuid,
  pub category:   String,
  pub points:     i64,
  pub updated_at: DateTime<Utc>,
}
