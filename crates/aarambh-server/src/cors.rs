//! Cross-origin policy for browser clients.

use std::time::Duration;

use anyhow::{Context as _, bail};
use axum::http::{
  HeaderValue, Method,
  header::{AUTHORIZATION, CONTENT_TYPE},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// How long browsers may cache a preflight answer.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// A [`CorsLayer`] admitting `origins`, or any origin when the list is empty.
///
/// Credentials are never allowed; clients authenticate with a bearer header,
/// not cookies.
pub fn build_cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
  let allow_origin = if origins.is_empty() {
    AllowOrigin::any()
  } else {
    let parsed = origins
      .iter()
      .map(|o| parse_origin(o))
      .collect::<anyhow::Result<Vec<_>>>()?;
    AllowOrigin::list(parsed)
  };

  Ok(
    CorsLayer::new()
      .allow_origin(allow_origin)
      .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
      ])
      .allow_headers([CONTENT_TYPE, AUTHORIZATION])
      .max_age(PREFLIGHT_MAX_AGE),
  )
}

fn parse_origin(origin: &str) -> anyhow::Result<HeaderValue> {
  let origin = origin.trim().trim_end_matches('/');
  if !(origin.starts_with("http://") || origin.starts_with("https://")) {
    bail!("invalid CORS origin {origin:?}: expected http:// or https://");
  }
  origin
    .parse()
    .with_context(|| format!("invalid CORS origin {origin:?}"))
}

#[cfg(test)]
mod tests {
  use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
  };
  use tower::ServiceExt as _;

  use super::*;

  fn app(origins: &[&str]) -> Router {
    let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
    Router::new()
      .route("/", get(|| async { "ok" }))
      .layer(build_cors_layer(&origins).unwrap())
  }

  fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
      .method("OPTIONS")
      .uri("/")
      .header(header::ORIGIN, origin)
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
      .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
      .body(Body::empty())
      .unwrap()
  }

  #[tokio::test]
  async fn listed_origin_passes_preflight() {
    let resp = app(&["https://aarambh.example"])
      .oneshot(preflight("https://aarambh.example"))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(
      headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
      "https://aarambh.example"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("DELETE"), "{methods}");
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
      .to_str()
      .unwrap()
      .to_ascii_lowercase();
    assert!(allowed.contains("authorization"), "{allowed}");
  }

  #[tokio::test]
  async fn unlisted_origin_gets_no_allow_header() {
    let resp = app(&["https://aarambh.example"])
      .oneshot(preflight("https://evil.example"))
      .await
      .unwrap();
    assert!(!resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
  }

  #[tokio::test]
  async fn empty_list_admits_any_origin() {
    let req = Request::builder()
      .uri("/")
      .header(header::ORIGIN, "http://localhost:5173")
      .body(Body::empty())
      .unwrap();
    let resp = app(&[]).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
  }

  #[test]
  fn malformed_origins_are_config_errors() {
    assert!(build_cors_layer(&["aarambh.example".to_string()]).is_err());
    assert!(build_cors_layer(&["https://bad\norigin".to_string()]).is_err());
    assert!(build_cors_layer(&["https://aarambh.example/".to_string()]).is_ok());
  }
}
