//! Handlers for `/auth` endpoints: local e-mail/password accounts.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signup` | 201 `{token, account, profile}` |
//! | `POST` | `/auth/signin` | `{token, account}`; 401 on bad credentials |
//! | `POST` | `/auth/signout` | Tokens are stateless; acknowledges only |
//! | `GET`  | `/auth/me` | Bearer; `{account, profile}` |
//! | `PUT`  | `/auth/password` | Bearer; `{password}` |

use aarambh_core::{
  account::{
    Account, MIN_PASSWORD_LEN, NewAccount, Profile, is_plausible_email,
    normalize_email,
  },
  store::PlatformStore,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{AppState, JsonBody, auth::AuthUser, error::ApiError, password};

fn check_password(password: Option<String>) -> Result<String, ApiError> {
  password.filter(|p| p.chars().count() >= MIN_PASSWORD_LEN).ok_or_else(|| {
    ApiError::BadRequest(format!(
      "Password must be at least {MIN_PASSWORD_LEN} characters long"
    ))
  })
}

// ─── Sign up ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  pub email:     Option<String>,
  pub password:  Option<String>,
  #[serde(alias = "name")]
  pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
  pub token:   String,
  pub account: Account,
  pub profile: Profile,
}

/// `POST /auth/signup`
pub async fn signup<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<SignupBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore + 'static,
{
  let email = body
    .email
    .map(|e| normalize_email(&e))
    .filter(|e| is_plausible_email(e))
    .ok_or_else(|| ApiError::BadRequest("A valid email address is required".into()))?;
  let password = check_password(body.password)?;

  let password_hash = password::hash_password(&password)
    .map_err(|e| ApiError::internal(format!("hashing password for {email}"), e))?;

  let created = state
    .store
    .create_account(NewAccount {
      email: email.clone(),
      password_hash,
      full_name: body.full_name.unwrap_or_default().trim().to_string(),
    })
    .await
    .map_err(|e| ApiError::internal(format!("creating account for {email}"), e))?;
  let Some((account, profile)) = created else {
    return Err(ApiError::Conflict {
      message: "Email already registered".into(),
      id:      None,
    });
  };

  let token = state.tokens.issue(account.user_id).map_err(|e| {
    ApiError::internal(format!("issuing token for user {}", account.user_id), e)
  })?;

  tracing::info!(user_id = %account.user_id, "account created");
  Ok((StatusCode::CREATED, Json(SignupResponse { token, account, profile })))
}

// ─── Sign in ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SigninBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SigninResponse {
  pub token:   String,
  pub account: Account,
}

/// `POST /auth/signin`
pub async fn signin<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<SigninBody>,
) -> Result<Json<SigninResponse>, ApiError>
where
  S: PlatformStore + 'static,
{
  let (Some(email), Some(password)) = (body.email, body.password) else {
    return Err(ApiError::InvalidCredentials);
  };
  let email = normalize_email(&email);

  let credentials = state
    .store
    .find_credentials(&email)
    .await
    .map_err(|e| ApiError::internal(format!("looking up credentials for {email}"), e))?
    .ok_or(ApiError::InvalidCredentials)?;

  let user_id = credentials.account.user_id;
  let matches = password::verify_password(&password, &credentials.password_hash)
    .map_err(|e| ApiError::internal(format!("verifying password of user {user_id}"), e))?;
  if !matches {
    return Err(ApiError::InvalidCredentials);
  }

  let token = state
    .tokens
    .issue(user_id)
    .map_err(|e| ApiError::internal(format!("issuing token for user {user_id}"), e))?;
  Ok(Json(SigninResponse { token, account: credentials.account }))
}

// ─── Sign out ─────────────────────────────────────────────────────────────────

/// `POST /auth/signout`
///
/// Nothing is revoked server-side; the client drops its token, which stays
/// valid until it expires.
pub async fn signout() -> Json<Value> {
  Json(json!({ "message": "Successfully signed out" }))
}

// ─── Me ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MeResponse {
  pub account: Account,
  pub profile: Option<Profile>,
}

/// `GET /auth/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<MeResponse>, ApiError>
where
  S: PlatformStore + 'static,
{
  let user_id = user.account.user_id;
  let profile = state
    .store
    .get_profile(user_id)
    .await
    .map_err(|e| ApiError::internal(format!("loading profile of user {user_id}"), e))?;
  Ok(Json(MeResponse { account: user.account, profile }))
}

// ─── Password ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PasswordBody {
  pub password: Option<String>,
}

/// `PUT /auth/password`
pub async fn change_password<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  JsonBody(body): JsonBody<PasswordBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlatformStore + 'static,
{
  let password = check_password(body.password)?;
  let user_id = user.account.user_id;

  let password_hash = password::hash_password(&password)
    .map_err(|e| ApiError::internal(format!("hashing password of user {user_id}"), e))?;
  let updated = state
    .store
    .set_password_hash(user_id, password_hash)
    .await
    .map_err(|e| ApiError::internal(format!("updating password of user {user_id}"), e))?;
  if !updated {
    return Err(ApiError::NotFound("Account not found".into()));
  }

  tracing::info!(%user_id, "password changed");
  Ok(Json(json!({ "message": "Password updated successfully" })))
}
