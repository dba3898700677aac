//! Handlers for `/achievements` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/achievements` | Public catalog |
//! | `GET`  | `/achievements/user` | Caller's awards, newest first |
//! | `GET`  | `/achievements/leaderboard` | Public; `?limit=N`, default 10 |
//! | `GET`  | `/achievements/progress` | Caller's counters |
//! | `POST` | `/achievements/progress` | Body: `{"category":"quiz","points":5}` |

use aarambh_core::{
  account::LeaderboardEntry,
  achievement::{Achievement, EarnedAchievement, MAX_POINTS, UserProgress},
  service::DEFAULT_LEADERBOARD_LIMIT,
  store::PlatformStore,
};
use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppState, JsonBody, auth::AuthUser, error::ApiError, params};

/// Points credited when the body omits them or sends something unusable.
const DEFAULT_POINTS: i64 = 1;

// ─── Catalog ──────────────────────────────────────────────────────────────────

/// `GET /achievements`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Achievement>>, ApiError>
where
  S: PlatformStore + 'static,
{
  let achievements = state
    .service
    .list_achievements()
    .await
    .map_err(|e| ApiError::internal("listing achievements", e))?;
  Ok(Json(achievements))
}

// ─── Awards ───────────────────────────────────────────────────────────────────

/// `GET /achievements/user`
pub async fn earned<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<Vec<EarnedAchievement>>, ApiError>
where
  S: PlatformStore + 'static,
{
  let user_id = user.account.user_id;
  let earned = state
    .service
    .list_user_achievements(user_id)
    .await
    .map_err(|e| ApiError::internal(format!("listing achievements of user {user_id}"), e))?;
  Ok(Json(earned))
}

// ─── Leaderboard ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
  pub limit: Option<String>,
}

/// `GET /achievements/leaderboard[?limit=N]`
pub async fn leaderboard<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError>
where
  S: PlatformStore + 'static,
{
  let limit = params::positive_count(params.limit.as_deref(), DEFAULT_LEADERBOARD_LIMIT);
  let entries = state
    .service
    .leaderboard(limit)
    .await
    .map_err(|e| ApiError::internal(format!("loading leaderboard (limit {limit})"), e))?;
  Ok(Json(entries))
}

// ─── Progress ─────────────────────────────────────────────────────────────────

/// `GET /achievements/progress`
pub async fn progress<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<Vec<UserProgress>>, ApiError>
where
  S: PlatformStore + 'static,
{
  let user_id = user.account.user_id;
  let rows = state
    .service
    .list_progress(user_id)
    .await
    .map_err(|e| ApiError::internal(format!("listing progress of user {user_id}"), e))?;
  Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct ProgressBody {
  /// Anything but a non-empty string is treated as missing.
  #[serde(default)]
  pub category: Option<Value>,
  /// Number or numeric string; see [`params::positive_points`].
  #[serde(default)]
  pub points:   Option<Value>,
}

/// `POST /achievements/progress`
///
/// Increments the caller's counter and awards whatever it unlocks. Responds
/// with the counter as it stands after the increment.
pub async fn update_progress<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  JsonBody(body): JsonBody<ProgressBody>,
) -> Result<Json<UserProgress>, ApiError>
where
  S: PlatformStore + 'static,
{
  let category = match body.category {
    Some(Value::String(c)) if !c.is_empty() => c,
    _ => return Err(ApiError::BadRequest("Category is required".into())),
  };
  let points = params::positive_points(body.points.as_ref(), DEFAULT_POINTS);
  if points > MAX_POINTS {
    return Err(ApiError::BadRequest(format!(
      "Points must not exceed {MAX_POINTS}"
    )));
  }
  let user_id = user.account.user_id;

  let progress = state
    .service
    .update_progress(user_id, &category, points)
    .await
    .map_err(|e| {
      ApiError::internal(
        format!("updating {category} progress of user {user_id} by {points}"),
        e,
      )
    })?;
  Ok(Json(progress))
}
