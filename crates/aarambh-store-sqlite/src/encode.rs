//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! width, so comparing or ordering the column text is chronological for
//! four-digit years (calendar input is held to that range). UUIDs are stored
//! as hyphenated lowercase strings.

use aarambh_core::{
  account::{Account, LeaderboardEntry, Profile},
  achievement::{Achievement, EarnedAchievement, UserAchievement, UserProgress},
  bookmark::Bookmark,
  calendar::CalendarEvent,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Convert a caller-supplied row limit into an SQLite integer.
pub fn encode_limit(limit: usize) -> Result<i64> {
  i64::try_from(limit).map_err(|_| Error::LimitOutOfRange(limit))
}

// ─── Column lists ─────────────────────────────────────────────────────────────

pub const ACHIEVEMENT_COLUMNS: &str = "achievement_id, title, description, icon, \
                                       category, required_points, points, created_at";

pub const USER_ACHIEVEMENT_COLUMNS: &str =
  "user_achievement_id, user_id, achievement_id, earned_at";

pub const PROGRESS_COLUMNS: &str = "user_id, category, points, updated_at";

pub const PROFILE_COLUMNS: &str =
  "user_id, full_name, total_points, achievement_count, updated_at";

pub const BOOKMARK_COLUMNS: &str = "bookmark_id, user_id, resource_type, resource_id, \
                                    title, description, thumbnail_url, created_at";

pub const EVENT_COLUMNS: &str = "event_id, user_id, summary, description, location, \
                                 start_time, end_time, timezone, created_at";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `achievements` row.
pub struct RawAchievement {
  pub achievement_id:  String,
  pub title:           String,
  pub description:     String,
  pub icon:            Option<String>,
  pub category:        String,
  pub required_points: i64,
  pub points:          i64,
  pub created_at:      String,
}

impl RawAchievement {
  /// Read [`ACHIEVEMENT_COLUMNS`] starting at column `at`.
  pub fn from_row_at(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      achievement_id:  row.get(at)?,
      title:           row.get(at + 1)?,
      description:     row.get(at + 2)?,
      icon:            row.get(at + 3)?,
      category:        row.get(at + 4)?,
      required_points: row.get(at + 5)?,
      points:          row.get(at + 6)?,
      created_at:      row.get(at + 7)?,
    })
  }

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> { Self::from_row_at(row, 0) }

  pub fn into_achievement(self) -> Result<Achievement> {
    Ok(Achievement {
      achievement_id:  decode_uuid(&self.achievement_id)?,
      title:           self.title,
      description:     self.description,
      icon:            self.icon,
      category:        self.category,
      required_points: self.required_points,
      points:          self.points,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `user_achievements` row.
pub struct RawUserAchievement {
  pub user_achievement_id: String,
  pub user_id:             String,
  pub achievement_id:      String,
  pub earned_at:           String,
}

impl RawUserAchievement {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_achievement_id: row.get(0)?,
      user_id:             row.get(1)?,
      achievement_id:      row.get(2)?,
      earned_at:           row.get(3)?,
    })
  }

  pub fn into_user_achievement(self) -> Result<UserAchievement> {
    Ok(UserAchievement {
      user_achievement_id: decode_uuid(&self.user_achievement_id)?,
      user_id:             decode_uuid(&self.user_id)?,
      achievement_id:      decode_uuid(&self.achievement_id)?,
      earned_at:           decode_dt(&self.earned_at)?,
    })
  }
}

/// A `user_achievements` row joined with its `achievements` row.
pub struct RawEarnedAchievement {
  pub award:       RawUserAchievement,
  pub achievement: RawAchievement,
}

impl RawEarnedAchievement {
  /// Expects [`USER_ACHIEVEMENT_COLUMNS`] followed by [`ACHIEVEMENT_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      award:       RawUserAchievement::from_row(row)?,
      achievement: RawAchievement::from_row_at(row, 4)?,
    })
  }

  pub fn into_earned(self) -> Result<EarnedAchievement> {
    Ok(EarnedAchievement {
      award:       self.award.into_user_achievement()?,
      achievement: self.achievement.into_achievement()?,
    })
  }
}

/// Raw values read directly from a `user_progress` row.
pub struct RawProgress {
  pub user_id:    String,
  pub category:   String,
  pub points:     i64,
  pub updated_at: String,
}

impl RawProgress {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      category:   row.get(1)?,
      points:     row.get(2)?,
      updated_at: row.get(3)?,
    })
  }

  pub fn into_progress(self) -> Result<UserProgress> {
    Ok(UserProgress {
      user_id:    decode_uuid(&self.user_id)?,
      category:   self.category,
      points:     self.points,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub user_id:           String,
  pub full_name:         String,
  pub total_points:      i64,
  pub achievement_count: i64,
  pub updated_at:        String,
}

impl RawProfile {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:           row.get(0)?,
      full_name:         row.get(1)?,
      total_points:      row.get(2)?,
      achievement_count: row.get(3)?,
      updated_at:        row.get(4)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      user_id:           decode_uuid(&self.user_id)?,
      full_name:         self.full_name,
      total_points:      self.total_points,
      achievement_count: self.achievement_count,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}

/// The leaderboard projection of a `profiles` row.
pub struct RawLeaderboardEntry {
  pub user_id:           String,
  pub full_name:         String,
  pub total_points:      i64,
  pub achievement_count: i64,
}

impl RawLeaderboardEntry {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:           row.get(0)?,
      full_name:         row.get(1)?,
      total_points:      row.get(2)?,
      achievement_count: row.get(3)?,
    })
  }

  pub fn into_entry(self) -> Result<LeaderboardEntry> {
    Ok(LeaderboardEntry {
      user_id:           decode_uuid(&self.user_id)?,
      full_name:         self.full_name,
      total_points:      self.total_points,
      achievement_count: self.achievement_count,
    })
  }
}

/// Raw values read from an `accounts` row; the password hash is optional so
/// the same type serves both account reads and credential lookups.
pub struct RawAccount {
  pub user_id:       String,
  pub email:         String,
  pub created_at:    String,
  pub password_hash: Option<String>,
}

impl RawAccount {
  /// Expects `user_id, email, created_at`.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      created_at:    row.get(2)?,
      password_hash: None,
    })
  }

  /// Expects `user_id, email, created_at, password_hash`.
  pub fn from_row_with_hash(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      password_hash: Some(row.get(3)?),
      ..Self::from_row(row)?
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      user_id:    decode_uuid(&self.user_id)?,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `bookmarks` row.
pub struct RawBookmark {
  pub bookmark_id:   String,
  pub user_id:       String,
  pub resource_type: String,
  pub resource_id:   String,
  pub title:         String,
  pub description:   Option<String>,
  pub thumbnail_url: Option<String>,
  pub created_at:    String,
}

impl RawBookmark {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      bookmark_id:   row.get(0)?,
      user_id:       row.get(1)?,
      resource_type: row.get(2)?,
      resource_id:   row.get(3)?,
      title:         row.get(4)?,
      description:   row.get(5)?,
      thumbnail_url: row.get(6)?,
      created_at:    row.get(7)?,
    })
  }

  pub fn into_bookmark(self) -> Result<Bookmark> {
    Ok(Bookmark {
      bookmark_id:   decode_uuid(&self.bookmark_id)?,
      user_id:       decode_uuid(&self.user_id)?,
      resource_type: self.resource_type,
      resource_id:   self.resource_id,
      title:         self.title,
      description:   self.description,
      thumbnail_url: self.thumbnail_url,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `calendar_events` row.
pub struct RawEvent {
  pub event_id:    String,
  pub user_id:     String,
  pub summary:     String,
  pub description: String,
  pub location:    String,
  pub start_time:  String,
  pub end_time:    String,
  pub timezone:    String,
  pub created_at:  String,
}

impl RawEvent {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:    row.get(0)?,
      user_id:     row.get(1)?,
      summary:     row.get(2)?,
      description: row.get(3)?,
      location:    row.get(4)?,
      start_time:  row.get(5)?,
      end_time:    row.get(6)?,
      timezone:    row.get(7)?,
      created_at:  row.get(8)?,
    })
  }

  pub fn into_event(self) -> Result<CalendarEvent> {
    let event_id = decode_uuid(&self.event_id)?;
    Ok(CalendarEvent {
      event_id,
      user_id:     decode_uuid(&self.user_id)?,
      summary:     self.summary,
      description: self.description,
      location:    self.location,
      start_time:  decode_dt(&self.start_time)?,
      end_time:    decode_dt(&self.end_time)?,
      timezone:    self.timezone,
      link:        CalendarEvent::link_for(event_id),
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_have_fixed_width() {
    let whole = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    let fractional = whole + chrono::Duration::microseconds(7);
    assert_eq!(encode_dt(whole), "2026-01-02T03:04:05.000000Z");
    assert_eq!(encode_dt(fractional), "2026-01-02T03:04:05.000007Z");
    assert!(encode_dt(whole) < encode_dt(fractional));
  }

  #[test]
  fn timestamp_decodes_to_same_instant() {
    let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
    assert_eq!(decode_dt(&encode_dt(at)).unwrap(), at);
  }

  #[test]
  fn bad_timestamp_is_an_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
