//! Bearer token issuing and verification.
//!
//! Tokens are HS256-signed JWTs whose subject is the account's `user_id`.
//! They are stateless: signing out is the client discarding its token.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// The account's `user_id`.
  pub sub: Uuid,
  /// Expiration time (Unix seconds).
  pub exp: i64,
  /// Issued-at time (Unix seconds).
  pub iat: i64,
}

/// Signing material plus token lifetime, shared by every request.
pub struct TokenKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl_secs: i64,
}

impl TokenKeys {
  pub fn new(secret: &str, ttl_secs: i64) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl_secs,
    }
  }

  /// Issue a token for `user_id`, valid for the configured lifetime.
  pub fn issue(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims { sub: user_id, iat: now, exp: now + self.ttl_secs };
    encode(&Header::default(), &claims, &self.encoding)
  }

  /// Check signature and expiry, returning the embedded claims.
  pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
    Ok(data.claims)
  }
}
