//! The `PlatformStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `aarambh-store-sqlite`).
//! Higher layers (`aarambh-api`, the [`AchievementService`]) depend on this
//! abstraction, not on any concrete backend.
//!
//! [`AchievementService`]: crate::service::AchievementService

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  account::{Account, Credentials, LeaderboardEntry, NewAccount, Profile},
  achievement::{
    Achievement, EarnedAchievement, NewAchievement, UserAchievement, UserProgress,
  },
  bookmark::{Bookmark, NewBookmark},
  calendar::{CalendarEvent, NewCalendarEvent},
};

/// Abstraction over the Aarambh persistent store.
///
/// Backends must provide these guarantees:
///
/// - [`increment_progress`](Self::increment_progress) and
///   [`credit_profile`](Self::credit_profile) perform the addition inside the
///   store, never as a read followed by a write from the caller.
/// - [`insert_user_achievement`](Self::insert_user_achievement) and
///   [`insert_bookmark`](Self::insert_bookmark) are backed by uniqueness
///   constraints, so concurrent duplicates lose instead of double-inserting.
/// - All timestamps on created or updated rows are assigned by the store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PlatformStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Catalog ───────────────────────────────────────────────────────────

  /// Add a catalog entry. If an entry with the same title already exists it
  /// is returned unchanged instead.
  fn add_achievement(
    &self,
    input: NewAchievement,
  ) -> impl Future<Output = Result<Achievement, Self::Error>> + Send + '_;

  /// The full catalog, ordered by category then `required_points`.
  fn list_achievements(
    &self,
  ) -> impl Future<Output = Result<Vec<Achievement>, Self::Error>> + Send + '_;

  /// Retrieve a catalog entry by id. Returns `None` if not found.
  fn get_achievement(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Achievement>, Self::Error>> + Send + '_;

  /// Achievements in `category` with `required_points <= points`, ordered by
  /// `required_points` ascending.
  fn achievements_unlocked_at<'a>(
    &'a self,
    category: &'a str,
    points: i64,
  ) -> impl Future<Output = Result<Vec<Achievement>, Self::Error>> + Send + 'a;

  // ── Awards ────────────────────────────────────────────────────────────

  /// Look up the award row for a `(user, achievement)` pair.
  fn find_user_achievement(
    &self,
    user_id: Uuid,
    achievement_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserAchievement>, Self::Error>> + Send + '_;

  /// Record an award stamped with the current time. Returns `None` without
  /// writing if the pair already has one.
  fn insert_user_achievement(
    &self,
    user_id: Uuid,
    achievement_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserAchievement>, Self::Error>> + Send + '_;

  /// All awards for a user joined with their catalog entries, most recently
  /// earned first.
  fn list_user_achievements(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<EarnedAchievement>, Self::Error>> + Send + '_;

  // ── Progress ──────────────────────────────────────────────────────────

  /// Add `points` to the user's counter in `category`, creating it if absent,
  /// and return the row as it stands after the increment.
  fn increment_progress<'a>(
    &'a self,
    user_id: Uuid,
    category: &'a str,
    points: i64,
  ) -> impl Future<Output = Result<UserProgress, Self::Error>> + Send + 'a;

  /// All progress counters for a user, ordered by category.
  fn list_progress(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<UserProgress>, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Add `points` to `total_points` and one to `achievement_count`, creating
  /// a zeroed profile first if the user has none.
  fn credit_profile(
    &self,
    user_id: Uuid,
    points: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Up to `limit` profiles by `total_points` descending, ties broken by
  /// `user_id` ascending.
  fn leaderboard(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<LeaderboardEntry>, Self::Error>> + Send + '_;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Create an account and its empty profile atomically. Returns `None` if
  /// the e-mail address is already registered.
  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Option<(Account, Profile)>, Self::Error>> + Send + '_;

  fn get_account(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Look up an account and its password hash by (normalised) e-mail.
  fn find_credentials<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  /// Replace an account's password hash. Returns `false` if the account does
  /// not exist.
  fn set_password_hash(
    &self,
    user_id: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Bookmarks ─────────────────────────────────────────────────────────

  /// A user's bookmarks, newest first.
  fn list_bookmarks(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Bookmark>, Self::Error>> + Send + '_;

  fn find_bookmark<'a>(
    &'a self,
    user_id: Uuid,
    resource_type: &'a str,
    resource_id: &'a str,
  ) -> impl Future<Output = Result<Option<Bookmark>, Self::Error>> + Send + 'a;

  /// Insert a bookmark. Returns `None` without writing if the user already
  /// bookmarked the same resource.
  fn insert_bookmark(
    &self,
    input: NewBookmark,
  ) -> impl Future<Output = Result<Option<Bookmark>, Self::Error>> + Send + '_;

  /// A bookmark by id, only if it belongs to `user_id`.
  fn get_owned_bookmark(
    &self,
    user_id: Uuid,
    bookmark_id: Uuid,
  ) -> impl Future<Output = Result<Option<Bookmark>, Self::Error>> + Send + '_;

  /// Delete a bookmark. Returns `false` if no row was removed.
  fn delete_bookmark(
    &self,
    bookmark_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Calendar ──────────────────────────────────────────────────────────

  fn insert_event(
    &self,
    input: NewCalendarEvent,
  ) -> impl Future<Output = Result<CalendarEvent, Self::Error>> + Send + '_;

  /// A user's events starting at or after `from`, earliest first.
  fn upcoming_events(
    &self,
    user_id: Uuid,
    from: DateTime<Utc>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<CalendarEvent>, Self::Error>> + Send + '_;
}
