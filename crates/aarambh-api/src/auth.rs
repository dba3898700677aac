//! Bearer-token authentication extractor.

use aarambh_core::{account::Account, store::PlatformStore};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};

use crate::{
  AppState,
  error::{ApiError, AuthFailure},
};

/// The authenticated caller. Present in a handler means the request carried
/// a valid token for an existing account.
#[derive(Debug, Clone)]
pub struct AuthUser {
  pub account: Account,
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let token = value.strip_prefix("Bearer ")?.trim();
  (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: PlatformStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)
      .ok_or(ApiError::Unauthorized(AuthFailure::MissingToken))?;

    let claims = state.tokens.verify(token).map_err(|e| {
      tracing::debug!(error = %e, "rejected bearer token");
      ApiError::Unauthorized(AuthFailure::InvalidToken)
    })?;

    match state.store.get_account(claims.sub).await {
      Ok(Some(account)) => Ok(AuthUser { account }),
      Ok(None) => Err(ApiError::Unauthorized(AuthFailure::InvalidToken)),
      Err(e) => {
        tracing::warn!(user_id = %claims.sub, error = %e, "account lookup failed");
        Err(ApiError::Unauthorized(AuthFailure::AuthenticationFailed))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn extracts_bearer_token() {
    assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
  }

  #[test]
  fn rejects_other_schemes_and_blanks() {
    assert_eq!(bearer_token(&HeaderMap::new()), None);
    assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
    assert_eq!(bearer_token(&headers("Bearer ")), None);
    assert_eq!(bearer_token(&headers("bearer abc")), None);
  }
}
