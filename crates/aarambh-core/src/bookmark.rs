//! Bookmarks: a user's saved pointers to learning resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// At most one bookmark exists per `(user_id, resource_type, resource_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
  pub bookmark_id:   Uuid,
  pub user_id:       Uuid,
  /// Kind of resource, e.g. `"scholarship"` or `"course"`.
  pub resource_type: String,
  /// Identifier of the resource within its kind; opaque to the backend.
  pub resource_id:   String,
  pub title:         String,
  pub description:   Option<String>,
  pub thumbnail_url: Option<String>,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::PlatformStore::insert_bookmark`].
#[derive(Debug, Clone)]
pub struct NewBookmark {
  pub user_id:       Uuid,
  pub resource_type: String,
  pub resource_id:   String,
  pub title:         String,
  pub description:   Option<String>,
  pub thumbnail_url: Option<String>,
}
