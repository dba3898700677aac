//! JSON REST API for Aarambh.
//!
//! Exposes an axum [`Router`] backed by any [`PlatformStore`]. Bearer tokens
//! are issued and checked here; TLS and request tracing are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(store, TokenKeys::new(&secret, 3600));
//! axum::serve(listener, aarambh_api::api_router(state)).await?;
//! ```

pub mod accounts;
pub mod achievements;
pub mod auth;
pub mod bookmarks;
pub mod calendar;
pub mod error;
pub mod params;
pub mod password;
pub mod token;

use std::sync::Arc;

use aarambh_core::{service::AchievementService, store::PlatformStore};
use axum::{
  Json, Router,
  extract::FromRequest,
  routing::{delete, get, post, put},
};
use serde_json::{Value, json};

#[cfg(test)]
mod flaky_store;

pub use error::ApiError;
pub use token::TokenKeys;

/// Shared state handed to every handler.
pub struct AppState<S> {
  pub store:   Arc<S>,
  pub service: AchievementService<S>,
  pub tokens:  Arc<TokenKeys>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      service: self.service.clone(),
      tokens:  Arc::clone(&self.tokens),
    }
  }
}

impl<S: PlatformStore> AppState<S> {
  pub fn new(store: Arc<S>, tokens: TokenKeys) -> Self {
    Self {
      service: AchievementService::new(Arc::clone(&store)),
      store,
      tokens: Arc::new(tokens),
    }
  }
}

/// [`axum::Json`] whose rejections render as an [`ApiError`] body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `GET /`
async fn banner() -> Json<Value> {
  Json(json!({ "message": "Welcome to Aarambh API" }))
}

/// Build a fully-materialised API router over `state`.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: PlatformStore + 'static,
{
  Router::new()
    .route("/", get(banner))
    // Achievements
    .route("/achievements", get(achievements::list::<S>))
    .route("/achievements/user", get(achievements::earned::<S>))
    .route("/achievements/leaderboard", get(achievements::leaderboard::<S>))
    .route(
      "/achievements/progress",
      get(achievements::progress::<S>).post(achievements::update_progress::<S>),
    )
    // Bookmarks
    .route("/bookmarks", get(bookmarks::list::<S>).post(bookmarks::create::<S>))
    .route("/bookmarks/check", get(bookmarks::check::<S>))
    .route("/bookmarks/{id}", delete(bookmarks::remove::<S>))
    // Accounts
    .route("/auth/signup", post(accounts::signup::<S>))
    .route("/auth/signin", post(accounts::signin::<S>))
    .route("/auth/signout", post(accounts::signout))
    .route("/auth/me", get(accounts::me::<S>))
    .route("/auth/password", put(accounts::change_password::<S>))
    // Calendar
    .route(
      "/calendar/events",
      get(calendar::upcoming::<S>).post(calendar::create::<S>),
    )
    .with_state(state)
}
