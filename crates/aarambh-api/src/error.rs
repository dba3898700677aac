//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error response is a JSON object with an `error` string. Internal
//! failures are logged here, at the route boundary, and answered with an
//! opaque message.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Why a bearer-authenticated request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
  /// No `Authorization` header, or not of the form `Bearer <token>`.
  MissingToken,
  /// The token failed verification or names an unknown account.
  InvalidToken,
  /// Resolving the token's account failed for an unrelated reason.
  AuthenticationFailed,
}

impl AuthFailure {
  pub fn message(self) -> &'static str {
    match self {
      Self::MissingToken => "Unauthorized: Missing or invalid token",
      Self::InvalidToken => "Unauthorized: Invalid token",
      Self::AuthenticationFailed => "Unauthorized: Authentication failed",
    }
  }
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{}", .0.message())]
  Unauthorized(AuthFailure),

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// The resource already exists; `id` names the existing record if known.
  #[error("conflict: {message}")]
  Conflict { message: String, id: Option<Uuid> },

  #[error("{context}: {source}")]
  Internal {
    context: String,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Wrap an unexpected failure with a description of what was being done.
  pub fn internal<E>(context: impl Into<String>, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal { context: context.into(), source: Box::new(source) }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::Unauthorized(failure) => {
        (StatusCode::UNAUTHORIZED, json!({ "error": failure.message() }))
      }
      ApiError::InvalidCredentials => {
        (StatusCode::UNAUTHORIZED, json!({ "error": "Invalid credentials" }))
      }
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::Conflict { message, id } => {
        (StatusCode::CONFLICT, json!({ "error": message, "id": id }))
      }
      ApiError::Internal { context, source } => {
        tracing::error!(%context, error = %source, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": "Internal server error" }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn internal_errors_do_not_leak_detail() {
    let err = ApiError::internal(
      "listing achievements",
      std::io::Error::other("disk on fire"),
    );
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({ "error": "Internal server error" }));
  }

  #[tokio::test]
  async fn conflict_carries_existing_id() {
    let id = Uuid::new_v4();
    let resp = ApiError::Conflict { message: "Resource already bookmarked".into(), id: Some(id) }
      .into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(
      body_json(resp).await,
      json!({ "error": "Resource already bookmarked", "id": id })
    );
  }

  #[tokio::test]
  async fn unauthorized_uses_fixed_messages() {
    let resp = ApiError::Unauthorized(AuthFailure::MissingToken).into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
      body_json(resp).await,
      json!({ "error": "Unauthorized: Missing or invalid token" })
    );
  }
}
