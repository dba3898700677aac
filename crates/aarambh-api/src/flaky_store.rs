//! A [`PlatformStore`] that fails on demand, for exercising error paths.
//!
//! Every call delegates to an in-memory [`SqliteStore`] unless the operation
//! has been told to fail. [`FlakyStore::fail_after`] lets an operation succeed
//! a fixed number of times before it starts failing.

use std::{collections::HashMap, sync::Mutex};

use aarambh_core::{
  account::{Account, Credentials, LeaderboardEntry, NewAccount, Profile},
  achievement::{
    Achievement, EarnedAchievement, NewAchievement, UserAchievement, UserProgress,
  },
  bookmark::{Bookmark, NewBookmark},
  calendar::{CalendarEvent, NewCalendarEvent},
  store::PlatformStore,
};
use aarambh_store_sqlite::SqliteStore;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum FlakyError {
  #[error("injected failure in {0}")]
  Injected(&'static str),

  #[error(transparent)]
  Store(#[from] aarambh_store_sqlite::Error),
}

type Result<T> = std::result::Result<T, FlakyError>;

pub struct FlakyStore {
  inner: SqliteStore,
  /// Remaining successful calls per operation name.
  plan:  Mutex<HashMap<&'static str, usize>>,
}

impl FlakyStore {
  pub async fn open_in_memory() -> Self {
    Self {
      inner: SqliteStore::open_in_memory().await.unwrap(),
      plan:  Mutex::new(HashMap::new()),
    }
  }

  /// Let `op` succeed `successes` more times, then fail every call.
  pub fn fail_after(&self, op: &'static str, successes: usize) {
    self.plan.lock().unwrap().insert(op, successes);
  }

  pub fn heal(&self, op: &'static str) { self.plan.lock().unwrap().remove(op); }

  fn trip(&self, op: &'static str) -> Result<()> {
    let mut plan = self.plan.lock().unwrap();
    match plan.get_mut(op) {
      Some(0) => Err(FlakyError::Injected(op)),
      Some(left) => {
        *left -= 1;
        Ok(())
      }
      None => Ok(()),
    }
  }
}

impl PlatformStore for FlakyStore {
  type Error = FlakyError;

  // ── Catalog ───────────────────────────────────────────────────────────

  async fn add_achievement(&self, input: NewAchievement) -> Result<Achievement> {
    self.trip("add_achievement")?;
    Ok(self.inner.add_achievement(input).await?)
  }

  async fn list_achievements(&self) -> Result<Vec<Achievement>> {
    self.trip("list_achievements")?;
    Ok(self.inner.list_achievements().await?)
  }

  async fn get_achievement(&self, id: Uuid) -> Result<Option<Achievement>> {
    self.trip("get_achievement")?;
    Ok(self.inner.get_achievement(id).await?)
  }

  async fn achievements_unlocked_at<'a>(
    &'a self,
    category: &'a str,
    points: i64,
  ) -> Result<Vec<Achievement>> {
    self.trip("achievements_unlocked_at")?;
    Ok(self.inner.achievements_unlocked_at(category, points).await?)
  }

  // ── Awards ────────────────────────────────────────────────────────────

  async fn find_user_achievement(
    &self,
    user_id: Uuid,
    achievement_id: Uuid,
  ) -> Result<Option<UserAchievement>> {
    self.trip("find_user_achievement")?;
    Ok(self.inner.find_user_achievement(user_id, achievement_id).await?)
  }

  async fn insert_user_achievement(
    &self,
    user_id: Uuid,
    achievement_id: Uuid,
  ) -> Result<Option<UserAchievement>> {
    self.trip("insert_user_achievement")?;
    Ok(self.inner.insert_user_achievement(user_id, achievement_id).await?)
  }

  async fn list_user_achievements(&self, user_id: Uuid) -> Result<Vec<EarnedAchievement>> {
    self.trip("list_user_achievements")?;
    Ok(self.inner.list_user_achievements(user_id).await?)
  }

  // ── Progress ──────────────────────────────────────────────────────────

  async fn increment_progress<'a>(
    &'a self,
    user_id: Uuid,
    category: &'a str,
    points: i64,
  ) -> Result<UserProgress> {
    self.trip("increment_progress")?;
    Ok(self.inner.increment_progress(user_id, category, points).await?)
  }

  async fn list_progress(&self, user_id: Uuid) -> Result<Vec<UserProgress>> {
    self.trip("list_progress")?;
    Ok(self.inner.list_progress(user_id).await?)
  }

  // ── Profiles ──────────────────────────────────────────────────────────

  async fn credit_profile(&self, user_id: Uuid, points: i64) -> Result<()> {
    self.trip("credit_profile")?;
    Ok(self.inner.credit_profile(user_id, points).await?)
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    self.trip("get_profile")?;
    Ok(self.inner.get_profile(user_id).await?)
  }

  async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
    self.trip("leaderboard")?;
    Ok(self.inner.leaderboard(limit).await?)
  }

  // ── Accounts ──────────────────────────────────────────────────────────

  async fn create_account(&self, input: NewAccount) -> Result<Option<(Account, Profile)>> {
    self.trip("create_account")?;
    Ok(self.inner.create_account(input).await?)
  }

  async fn get_account(&self, user_id: Uuid) -> Result<Option<Account>> {
    self.trip("get_account")?;
    Ok(self.inner.get_account(user_id).await?)
  }

  async fn find_credentials<'a>(&'a self, email: &'a str) -> Result<Option<Credentials>> {
    self.trip("find_credentials")?;
    Ok(self.inner.find_credentials(email).await?)
  }

  async fn set_password_hash(&self, user_id: Uuid, password_hash: String) -> Result<bool> {
    self.trip("set_password_hash")?;
    Ok(self.inner.set_password_hash(user_id, password_hash).await?)
  }

  // ── Bookmarks ─────────────────────────────────────────────────────────

  async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<Bookmark>> {
    self.trip("list_bookmarks")?;
    Ok(self.inner.list_bookmarks(user_id).await?)
  }

  async fn find_bookmark<'a>(
    &'a self,
    user_id: Uuid,
    resource_type: &'a str,
    resource_id: &'a str,
  ) -> Result<Option<Bookmark>> {
    self.trip("find_bookmark")?;
    Ok(self.inner.find_bookmark(user_id, resource_type, resource_id).await?)
  }

  async fn insert_bookmark(&self, input: NewBookmark) -> Result<Option<Bookmark>> {
    self.trip("insert_bookmark")?;
    Ok(self.inner.insert_bookmark(input).await?)
  }

  async fn get_owned_bookmark(
    &self,
    user_id: Uuid,
    bookmark_id: Uuid,
  ) -> Result<Option<Bookmark>> {
    self.trip("get_owned_bookmark")?;
    Ok(self.inner.get_owned_bookmark(user_id, bookmark_id).await?)
  }

  async fn delete_bookmark(&self, bookmark_id: Uuid) -> Result<bool> {
    self.trip("delete_bookmark")?;
    Ok(self.inner.delete_bookmark(bookmark_id).await?)
  }

  // ── Calendar ──────────────────────────────────────────────────────────

  async fn insert_event(&self, input: NewCalendarEvent) -> Result<CalendarEvent> {
    self.trip("insert_event")?;
    Ok(self.inner.insert_event(input).await?)
  }

  async fn upcoming_events(
    &self,
    user_id: Uuid,
    from: DateTime<Utc>,
    limit: usize,
  ) -> Result<Vec<CalendarEvent>> {
    self.trip("upcoming_events")?;
    Ok(self.inner.upcoming_events(user_id, from, limit).await?)
  }
}
