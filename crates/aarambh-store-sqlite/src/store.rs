//! [`SqliteStore`]: the SQLite implementation of [`PlatformStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use aarambh_core::{
  account::{Account, Credentials, LeaderboardEntry, NewAccount, Profile, normalize_email},
  achievement::{
    Achievement, EarnedAchievement, NewAchievement, UserAchievement, UserProgress,
  },
  bookmark::{Bookmark, NewBookmark},
  calendar::{CalendarEvent, NewCalendarEvent},
  store::PlatformStore,
};

use crate::{
  Result,
  encode::{
    ACHIEVEMENT_COLUMNS, BOOKMARK_COLUMNS, EVENT_COLUMNS, PROFILE_COLUMNS,
    PROGRESS_COLUMNS, RawAccount, RawAchievement, RawBookmark, RawEarnedAchievement,
    RawEvent, RawLeaderboardEntry, RawProfile, RawProgress, RawUserAchievement,
    USER_ACHIEVEMENT_COLUMNS, encode_dt, encode_limit, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Aarambh platform store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PlatformStore impl ──────────────────────────────────────────────────────

impl PlatformStore for SqliteStore {
  type Error = crate::Error;

  // ── Catalog ───────────────────────────────────────────────────────────────

  async fn add_achievement(&self, input: NewAchievement) -> Result<Achievement> {
    let id_str = encode_uuid(Uuid::new_v4());
    let at_str = encode_dt(Utc::now());

    let raw: RawAchievement = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO achievements (
             achievement_id, title, description, icon,
             category, required_points, points, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT (title) DO NOTHING",
          rusqlite::params![
            id_str,
            input.title,
            input.description,
            input.icon,
            input.category,
            input.required_points,
            input.points,
            at_str,
          ],
        )?;
        Ok(conn.query_row(
          &format!("SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE title = ?1"),
          rusqlite::params![input.title],
          RawAchievement::from_row,
        )?)
      })
      .await?;

    raw.into_achievement()
  }

  async fn list_achievements(&self) -> Result<Vec<Achievement>> {
    let raws: Vec<RawAchievement> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements
           ORDER BY category ASC, required_points ASC, title ASC"
        ))?;
        let rows = stmt
          .query_map([], RawAchievement::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAchievement::into_achievement).collect()
  }

  async fn get_achievement(&self, id: Uuid) -> Result<Option<Achievement>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAchievement> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE achievement_id = ?1"
            ),
            rusqlite::params![id_str],
            RawAchievement::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAchievement::into_achievement).transpose()
  }

  async fn achievements_unlocked_at<'a>(
    &'a self,
    category: &'a str,
    points:   i64,
  ) -> Result<Vec<Achievement>> {
    let category = category.to_owned();

    let raws: Vec<RawAchievement> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements
           WHERE category = ?1 AND required_points <= ?2
           ORDER BY required_points ASC, title ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![category, points], RawAchievement::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAchievement::into_achievement).collect()
  }

  // ── Awards ────────────────────────────────────────────────────────────────

  async fn find_user_achievement(
    &self,
    user_id:        Uuid,
    achievement_id: Uuid,
  ) -> Result<Option<UserAchievement>> {
    let user_str        = encode_uuid(user_id);
    let achievement_str = encode_uuid(achievement_id);

    let raw: Option<RawUserAchievement> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {USER_ACHIEVEMENT_COLUMNS} FROM user_achievements
               WHERE user_id = ?1 AND achievement_id = ?2"
            ),
            rusqlite::params![user_str, achievement_str],
            RawUserAchievement::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUserAchievement::into_user_achievement).transpose()
  }

  async fn insert_user_achievement(
    &self,
    user_id:        Uuid,
    achievement_id: Uuid,
  ) -> Result<Option<UserAchievement>> {
    let id_str          = encode_uuid(Uuid::new_v4());
    let user_str        = encode_uuid(user_id);
    let achievement_str = encode_uuid(achievement_id);
    let at_str          = encode_dt(Utc::now());

    // On conflict nothing is inserted and RETURNING yields no row.
    let raw: Option<RawUserAchievement> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "INSERT INTO user_achievements ({USER_ACHIEVEMENT_COLUMNS})
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT (user_id, achievement_id) DO NOTHING
               RETURNING {USER_ACHIEVEMENT_COLUMNS}"
            ),
            rusqlite::params![id_str, user_str, achievement_str, at_str],
            RawUserAchievement::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUserAchievement::into_user_achievement).transpose()
  }

  async fn list_user_achievements(&self, user_id: Uuid) -> Result<Vec<EarnedAchievement>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawEarnedAchievement> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             ua.user_achievement_id, ua.user_id, ua.achievement_id, ua.earned_at,
             a.achievement_id, a.title, a.description, a.icon,
             a.category, a.required_points, a.points, a.created_at
           FROM user_achievements ua
           JOIN achievements a ON a.achievement_id = ua.achievement_id
           WHERE ua.user_id = ?1
           ORDER BY ua.earned_at DESC, ua.rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawEarnedAchievement::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEarnedAchievement::into_earned).collect()
  }

  // ── Progress ──────────────────────────────────────────────────────────────

  async fn increment_progress<'a>(
    &'a self,
    user_id:  Uuid,
    category: &'a str,
    points:   i64,
  ) -> Result<UserProgress> {
    let user_str = encode_uuid(user_id);
    let category = category.to_owned();
    let at_str   = encode_dt(Utc::now());

    let raw: RawProgress = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO user_progress ({PROGRESS_COLUMNS})
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, category) DO UPDATE SET
               points     = user_progress.points + excluded.points,
               updated_at = excluded.updated_at
             RETURNING {PROGRESS_COLUMNS}"
          ),
          rusqlite::params![user_str, category, points, at_str],
          RawProgress::from_row,
        )?)
      })
      .await?;

    raw.into_progress()
  }

  async fn list_progress(&self, user_id: Uuid) -> Result<Vec<UserProgress>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawProgress> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROGRESS_COLUMNS} FROM user_progress
           WHERE user_id = ?1
           ORDER BY category ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawProgress::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProgress::into_progress).collect()
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn credit_profile(&self, user_id: Uuid, points: i64) -> Result<()> {
    let user_str = encode_uuid(user_id);
    let at_str   = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (user_id, full_name, total_points, achievement_count, updated_at)
           VALUES (?1, '', ?2, 1, ?3)
           ON CONFLICT (user_id) DO UPDATE SET
             total_points      = profiles.total_points + excluded.total_points,
             achievement_count = profiles.achievement_count + 1,
             updated_at        = excluded.updated_at",
          rusqlite::params![user_str, points, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let user_str = encode_uuid(user_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
            rusqlite::params![user_str],
            RawProfile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
    let limit_val = encode_limit(limit)?;

    let raws: Vec<RawLeaderboardEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, full_name, total_points, achievement_count
           FROM profiles
           ORDER BY total_points DESC, user_id ASC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawLeaderboardEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLeaderboardEntry::into_entry).collect()
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_account(&self, input: NewAccount) -> Result<Option<(Account, Profile)>> {
    let id_str = encode_uuid(Uuid::new_v4());
    let email  = normalize_email(&input.email);
    let at_str = encode_dt(Utc::now());

    let raws: Option<(RawAccount, RawProfile)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let inserted = tx.execute(
          "INSERT INTO accounts (user_id, email, password_hash, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)
           ON CONFLICT (email) DO NOTHING",
          rusqlite::params![id_str, email, input.password_hash, at_str],
        )?;
        if inserted == 0 {
          return Ok(None);
        }

        let profile = tx.query_row(
          &format!(
            "INSERT INTO profiles (user_id, full_name, total_points, achievement_count, updated_at)
             VALUES (?1, ?2, 0, 0, ?3)
             ON CONFLICT (user_id) DO UPDATE SET full_name = excluded.full_name
             RETURNING {PROFILE_COLUMNS}"
          ),
          rusqlite::params![id_str, input.full_name, at_str],
          RawProfile::from_row,
        )?;

        tx.commit()?;

        let account = RawAccount {
          user_id:       id_str,
          email,
          created_at:    at_str,
          password_hash: None,
        };
        Ok(Some((account, profile)))
      })
      .await?;

    let Some((account, profile)) = raws else { return Ok(None) };
    Ok(Some((account.into_account()?, profile.into_profile()?)))
  }

  async fn get_account(&self, user_id: Uuid) -> Result<Option<Account>> {
    let user_str = encode_uuid(user_id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, email, created_at FROM accounts WHERE user_id = ?1",
            rusqlite::params![user_str],
            RawAccount::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn find_credentials<'a>(&'a self, email: &'a str) -> Result<Option<Credentials>> {
    let email = normalize_email(email);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, email, created_at, password_hash
             FROM accounts WHERE email = ?1",
            rusqlite::params![email],
            RawAccount::from_row_with_hash,
          )
          .optional()?)
      })
      .await?;

    let Some(mut raw) = raw else { return Ok(None) };
    let password_hash = raw.password_hash.take().unwrap_or_default();
    Ok(Some(Credentials { account: raw.into_account()?, password_hash }))
  }

  async fn set_password_hash(&self, user_id: Uuid, password_hash: String) -> Result<bool> {
    let user_str = encode_uuid(user_id);
    let at_str   = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE accounts SET password_hash = ?2, updated_at = ?3 WHERE user_id = ?1",
          rusqlite::params![user_str, password_hash, at_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Bookmarks ─────────────────────────────────────────────────────────────

  async fn list_bookmarks(&self, user_id: Uuid) -> Result<Vec<Bookmark>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawBookmark> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {BOOKMARK_COLUMNS} FROM bookmarks
           WHERE user_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawBookmark::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBookmark::into_bookmark).collect()
  }

  async fn find_bookmark<'a>(
    &'a self,
    user_id:       Uuid,
    resource_type: &'a str,
    resource_id:   &'a str,
  ) -> Result<Option<Bookmark>> {
    let user_str      = encode_uuid(user_id);
    let resource_type = resource_type.to_owned();
    let resource_id   = resource_id.to_owned();

    let raw: Option<RawBookmark> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {BOOKMARK_COLUMNS} FROM bookmarks
               WHERE user_id = ?1 AND resource_type = ?2 AND resource_id = ?3"
            ),
            rusqlite::params![user_str, resource_type, resource_id],
            RawBookmark::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBookmark::into_bookmark).transpose()
  }

  async fn insert_bookmark(&self, input: NewBookmark) -> Result<Option<Bookmark>> {
    let id_str   = encode_uuid(Uuid::new_v4());
    let user_str = encode_uuid(input.user_id);
    let at_str   = encode_dt(Utc::now());

    let raw: Option<RawBookmark> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "INSERT INTO bookmarks ({BOOKMARK_COLUMNS})
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
               ON CONFLICT (user_id, resource_type, resource_id) DO NOTHING
               RETURNING {BOOKMARK_COLUMNS}"
            ),
            rusqlite::params![
              id_str,
              user_str,
              input.resource_type,
              input.resource_id,
              input.title,
              input.description,
              input.thumbnail_url,
              at_str,
            ],
            RawBookmark::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBookmark::into_bookmark).transpose()
  }

  async fn get_owned_bookmark(
    &self,
    user_id:     Uuid,
    bookmark_id: Uuid,
  ) -> Result<Option<Bookmark>> {
    let user_str = encode_uuid(user_id);
    let id_str   = encode_uuid(bookmark_id);

    let raw: Option<RawBookmark> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {BOOKMARK_COLUMNS} FROM bookmarks
               WHERE bookmark_id = ?1 AND user_id = ?2"
            ),
            rusqlite::params![id_str, user_str],
            RawBookmark::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBookmark::into_bookmark).transpose()
  }

  async fn delete_bookmark(&self, bookmark_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(bookmark_id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM bookmarks WHERE bookmark_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  // ── Calendar ──────────────────────────────────────────────────────────────

  async fn insert_event(&self, input: NewCalendarEvent) -> Result<CalendarEvent> {
    let id_str    = encode_uuid(Uuid::new_v4());
    let user_str  = encode_uuid(input.user_id);
    let start_str = encode_dt(input.start_time);
    let end_str   = encode_dt(input.end_time);
    let at_str    = encode_dt(Utc::now());

    let raw: RawEvent = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO calendar_events ({EVENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {EVENT_COLUMNS}"
          ),
          rusqlite::params![
            id_str,
            user_str,
            input.summary,
            input.description,
            input.location,
            start_str,
            end_str,
            input.timezone,
            at_str,
          ],
          RawEvent::from_row,
        )?)
      })
      .await?;

    raw.into_event()
  }

  async fn upcoming_events(
    &self,
    user_id: Uuid,
    from:    DateTime<Utc>,
    limit:   usize,
  ) -> Result<Vec<CalendarEvent>> {
    let user_str  = encode_uuid(user_id);
    let from_str  = encode_dt(from);
    let limit_val = encode_limit(limit)?;

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM calendar_events
           WHERE user_id = ?1 AND start_time >= ?2
           ORDER BY start_time ASC, rowid ASC
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, from_str, limit_val], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }
}
