//! The achievement engine.
//!
//! Progress accumulates per category; crossing a threshold awards every
//! achievement in that category whose `required_points` has been reached.
//! Awarding is idempotent, so re-crossing (or racing) a threshold never
//! credits a profile twice.
//!
//! Cascades are not transactional. If the Nth award of a cascade fails, the
//! awards before it stay committed and the error aborts the rest.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  account::LeaderboardEntry,
  achievement::{
    Achievement, AwardOutcome, EarnedAchievement, MAX_POINTS, UserProgress,
  },
  store::PlatformStore,
};

/// Number of profiles returned by [`AchievementService::leaderboard`] when the
/// caller doesn't say.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Business logic over a [`PlatformStore`].
///
/// Cloning is cheap; the store is reference-counted.
pub struct AchievementService<S> {
  store: Arc<S>,
}

impl<S> Clone for AchievementService<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<S: PlatformStore> AchievementService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn list_achievements(&self) -> Result<Vec<Achievement>> {
    self.store.list_achievements().await.map_err(Error::store)
  }

  pub async fn list_user_achievements(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<EarnedAchievement>> {
    self
      .store
      .list_user_achievements(user_id)
      .await
      .map_err(Error::store)
  }

  pub async fn list_progress(&self, user_id: Uuid) -> Result<Vec<UserProgress>> {
    self.store.list_progress(user_id).await.map_err(Error::store)
  }

  pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
    self.store.leaderboard(limit).await.map_err(Error::store)
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Award `achievement_id` to `user_id` unless they already hold it.
  ///
  /// The award row is committed before the profile is credited; a failed
  /// credit leaves an award that is not yet reflected in the totals.
  pub async fn award_achievement(
    &self,
    user_id: Uuid,
    achievement_id: Uuid,
  ) -> Result<AwardOutcome> {
    if let Some(existing) = self
      .store
      .find_user_achievement(user_id, achievement_id)
      .await
      .map_err(Error::store)?
    {
      return Ok(AwardOutcome::AlreadyEarned(existing));
    }

    let achievement = self
      .store
      .get_achievement(achievement_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::AchievementNotFound(achievement_id))?;

    let inserted = self
      .store
      .insert_user_achievement(user_id, achievement_id)
      .await
      .map_err(Error::store)?;

    let record = match inserted {
      Some(r) => r,
      // A concurrent award for the same pair got there first.
      None => {
        let existing = self
          .store
          .find_user_achievement(user_id, achievement_id)
          .await
          .map_err(Error::store)?
          .ok_or(Error::AchievementNotFound(achievement_id))?;
        return Ok(AwardOutcome::AlreadyEarned(existing));
      }
    };

    self
      .store
      .credit_profile(user_id, achievement.points)
      .await
      .map_err(Error::store)?;

    tracing::info!(
      %user_id,
      %achievement_id,
      title = %achievement.title,
      points = achievement.points,
      "achievement awarded"
    );

    Ok(AwardOutcome::Awarded(record))
  }

  /// Add `points` to the user's progress in `category`, then award every
  /// achievement in that category whose threshold is now met, lowest
  /// threshold first. `points` must lie in `1..=MAX_POINTS`.
  pub async fn update_progress(
    &self,
    user_id: Uuid,
    category: &str,
    points: i64,
  ) -> Result<UserProgress> {
    if !(1..=MAX_POINTS).contains(&points) {
      return Err(Error::InvalidPoints(points));
    }

    let progress = self
      .store
      .increment_progress(user_id, category, points)
      .await
      .map_err(Error::store)?;

    let eligible = self
      .store
      .achievements_unlocked_at(category, progress.points)
      .await
      .map_err(Error::store)?;

    for achievement in eligible {
      self
        .award_achievement(user_id, achievement.achievement_id)
        .await?;
    }

    Ok(progress)
  }
}
