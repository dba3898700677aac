//! Handlers for `/bookmarks` endpoints. Every route requires a bearer token
//! and only ever touches the caller's own bookmarks.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/bookmarks` | Newest first |
//! | `POST`   | `/bookmarks` | 409 with the existing id on duplicates |
//! | `DELETE` | `/bookmarks/{id}` | 404 unless owned by the caller |
//! | `GET`    | `/bookmarks/check` | `?resource_type=…&resource_id=…` |

use aarambh_core::{
  bookmark::{Bookmark, NewBookmark},
  store::PlatformStore,
};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, JsonBody, auth::AuthUser, error::ApiError};

const ALREADY_BOOKMARKED: &str = "Resource already bookmarked";
const NOT_FOUND: &str = "Bookmark not found or does not belong to user";

fn non_empty(s: Option<String>) -> Option<String> { s.filter(|s| !s.is_empty()) }

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /bookmarks`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<Vec<Bookmark>>, ApiError>
where
  S: PlatformStore + 'static,
{
  let user_id = user.account.user_id;
  let bookmarks = state
    .store
    .list_bookmarks(user_id)
    .await
    .map_err(|e| ApiError::internal(format!("listing bookmarks of user {user_id}"), e))?;
  Ok(Json(bookmarks))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub resource_type: Option<String>,
  pub resource_id:   Option<String>,
  pub title:         Option<String>,
  pub description:   Option<String>,
  pub thumbnail_url: Option<String>,
}

/// `POST /bookmarks`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore + 'static,
{
  let (Some(resource_type), Some(resource_id), Some(title)) = (
    non_empty(body.resource_type),
    non_empty(body.resource_id),
    non_empty(body.title),
  ) else {
    return Err(ApiError::BadRequest(
      "Resource type, ID, and title are required".into(),
    ));
  };
  let user_id = user.account.user_id;
  let context = || format!("bookmarking {resource_type}/{resource_id} for user {user_id}");

  let existing = state
    .store
    .find_bookmark(user_id, &resource_type, &resource_id)
    .await
    .map_err(|e| ApiError::internal(context(), e))?;
  if let Some(existing) = existing {
    return Err(ApiError::Conflict {
      message: ALREADY_BOOKMARKED.into(),
      id:      Some(existing.bookmark_id),
    });
  }

  let inserted = state
    .store
    .insert_bookmark(NewBookmark {
      user_id,
      resource_type: resource_type.clone(),
      resource_id: resource_id.clone(),
      title,
      description: non_empty(body.description),
      thumbnail_url: non_empty(body.thumbnail_url),
    })
    .await
    .map_err(|e| ApiError::internal(context(), e))?;

  match inserted {
    Some(bookmark) => Ok((StatusCode::CREATED, Json(bookmark))),
    // Lost a race with a concurrent insert of the same resource.
    None => {
      let existing = state
        .store
        .find_bookmark(user_id, &resource_type, &resource_id)
        .await
        .map_err(|e| ApiError::internal(context(), e))?;
      Err(ApiError::Conflict {
        message: ALREADY_BOOKMARKED.into(),
        id:      existing.map(|b| b.bookmark_id),
      })
    }
  }
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /bookmarks/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore + 'static,
{
  // An id that isn't a UUID can't name one of the caller's bookmarks.
  let bookmark_id =
    Uuid::parse_str(&id).map_err(|_| ApiError::NotFound(NOT_FOUND.into()))?;
  let user_id = user.account.user_id;
  let context = || format!("deleting bookmark {bookmark_id} of user {user_id}");

  state
    .store
    .get_owned_bookmark(user_id, bookmark_id)
    .await
    .map_err(|e| ApiError::internal(context(), e))?
    .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;

  let deleted = state
    .store
    .delete_bookmark(bookmark_id)
    .await
    .map_err(|e| ApiError::internal(context(), e))?;
  if !deleted {
    return Err(ApiError::NotFound(NOT_FOUND.into()));
  }

  Ok(Json(json!({ "message": "Bookmark deleted successfully" })))
}

// ─── Check ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CheckParams {
  pub resource_type: Option<String>,
  pub resource_id:   Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
  pub is_bookmarked: bool,
  pub bookmark_id:   Option<Uuid>,
}

/// `GET /bookmarks/check?resource_type=…&resource_id=…`
pub async fn check<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Query(params): Query<CheckParams>,
) -> Result<Json<CheckResponse>, ApiError>
where
  S: PlatformStore + 'static,
{
  let (Some(resource_type), Some(resource_id)) =
    (non_empty(params.resource_type), non_empty(params.resource_id))
  else {
    return Err(ApiError::BadRequest("Resource type and ID are required".into()));
  };
  let user_id = user.account.user_id;

  let found = state
    .store
    .find_bookmark(user_id, &resource_type, &resource_id)
    .await
    .map_err(|e| {
      ApiError::internal(
        format!("checking bookmark {resource_type}/{resource_id} of user {user_id}"),
        e,
      )
    })?;
  Ok(Json(CheckResponse {
    is_bookmarked: found.is_some(),
    bookmark_id:   found.map(|b| b.bookmark_id),
  }))
}
