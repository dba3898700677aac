//! Handlers for `/calendar/events`.

use aarambh_core::{
  Error as CoreError,
  calendar::{CalendarEvent, DEFAULT_TIMEZONE, NewCalendarEvent},
  store::PlatformStore,
};
use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{AppState, JsonBody, auth::AuthUser, error::ApiError, params};

const DEFAULT_MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub summary:     Option<String>,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub start_time:  Option<DateTime<Utc>>,
  pub end_time:    Option<DateTime<Utc>>,
  pub timezone:    Option<String>,
}

/// `POST /calendar/events`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore + 'static,
{
  let (Some(start_time), Some(end_time)) = (body.start_time, body.end_time) else {
    return Err(ApiError::BadRequest("Start and end times are required".into()));
  };
  let user_id = user.account.user_id;

  let input = NewCalendarEvent {
    user_id,
    summary: body.summary.unwrap_or_default(),
    description: body.description.unwrap_or_default(),
    location: body.location.unwrap_or_default(),
    start_time,
    end_time,
    timezone: body
      .timezone
      .filter(|tz| !tz.is_empty())
      .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
  };
  input.validate().map_err(|e| match e {
    CoreError::InvalidEvent(msg) => ApiError::BadRequest(msg),
    other => ApiError::internal("validating calendar event", other),
  })?;

  let event = state
    .store
    .insert_event(input)
    .await
    .map_err(|e| ApiError::internal(format!("creating event for user {user_id}"), e))?;
  Ok((StatusCode::CREATED, Json(event)))
}

#[derive(Debug, Deserialize)]
pub struct UpcomingParams {
  pub max_results: Option<String>,
}

/// `GET /calendar/events[?max_results=N]`
pub async fn upcoming<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Query(params): Query<UpcomingParams>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError>
where
  S: PlatformStore + 'static,
{
  let limit = params::positive_count(params.max_results.as_deref(), DEFAULT_MAX_RESULTS);
  let user_id = user.account.user_id;
  let events = state
    .store
    .upcoming_events(user_id, Utc::now(), limit)
    .await
    .map_err(|e| ApiError::internal(format!("listing events of user {user_id}"), e))?;
  Ok(Json(events))
}
