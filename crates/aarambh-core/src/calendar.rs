//! Calendar events: exam dates and deadlines a student wants reminding of.

use chrono::{DateTime, Datelike as _, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Latest year an event may fall in. Stored timestamps are fixed-width only
/// for four-digit years.
pub const MAX_EVENT_YEAR: i32 = 9999;

/// Timezone label attached to events that don't specify one.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
  pub event_id:    Uuid,
  pub user_id:     Uuid,
  pub summary:     String,
  pub description: String,
  pub location:    String,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
  /// IANA zone name the client should render the event in.
  pub timezone:    String,
  /// Deep link into Google Calendar for this event.
  pub link:        String,
  pub created_at:  DateTime<Utc>,
}

impl CalendarEvent {
  pub fn link_for(event_id: Uuid) -> String {
    format!("https://calendar.google.com/calendar/event?eid={event_id}")
  }
}

/// Input to [`crate::store::PlatformStore::insert_event`].
#[derive(Debug, Clone)]
pub struct NewCalendarEvent {
  pub user_id:     Uuid,
  pub summary:     String,
  pub description: String,
  pub location:    String,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
  pub timezone:    String,
}

impl NewCalendarEvent {
  /// Reject events with no summary or a non-positive duration.
  pub fn validate(&self) -> Result<()> {
    if self.summary.trim().is_empty() {
      return Err(Error::InvalidEvent("summary is required".into()));
    }
    if self.end_time <= self.start_time {
      return Err(Error::InvalidEvent(
        "end_time must be after start_time".into(),
      ));
    }
    if self.start_time.year() < 1 || self.end_time.year() > MAX_EVENT_YEAR {
      return Err(Error::InvalidEvent(format!(
        "event times must fall between years 1 and {MAX_EVENT_YEAR}"
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone as _};

  use super::*;

  fn event(start: DateTime<Utc>, end: DateTime<Utc>) -> NewCalendarEvent {
    NewCalendarEvent {
      user_id:     Uuid::new_v4(),
      summary:     "JEE Advanced".into(),
      description: String::new(),
      location:    String::new(),
      start_time:  start,
      end_time:    end,
      timezone:    DEFAULT_TIMEZONE.into(),
    }
  }

  #[test]
  fn accepts_positive_duration() {
    let start = Utc::now();
    assert!(event(start, start + Duration::hours(3)).validate().is_ok());
  }

  #[test]
  fn rejects_inverted_range() {
    let start = Utc::now();
    let err = event(start, start - Duration::minutes(1)).validate();
    assert!(matches!(err, Err(Error::InvalidEvent(_))));
    assert!(matches!(event(start, start).validate(), Err(Error::InvalidEvent(_))));
  }

  #[test]
  fn rejects_blank_summary() {
    let start = Utc::now();
    let mut e = event(start, start + Duration::hours(1));
    e.summary = "   ".into();
    assert!(matches!(e.validate(), Err(Error::InvalidEvent(_))));
  }

  #[test]
  fn rejects_years_past_four_digits() {
    let start = Utc.with_ymd_and_hms(9999, 12, 31, 23, 0, 0).unwrap();
    assert!(event(start, start + Duration::minutes(30)).validate().is_ok());
    assert!(matches!(
      event(start, start + Duration::hours(2)).validate(),
      Err(Error::InvalidEvent(_))
    ));

    let far = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
    assert!(matches!(
      event(far, far + Duration::hours(1)).validate(),
      Err(Error::InvalidEvent(_))
    ));
  }

  #[test]
  fn link_embeds_event_id() {
    let id = Uuid::new_v4();
    assert!(CalendarEvent::link_for(id).ends_with(&id.to_string()));
  }
}
