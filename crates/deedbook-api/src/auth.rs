//! Caller identity: HTTP Basic credentials checked against an argon2 hash.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use deedbook_core::store::ClientStore;

use crate::{AppState, error::ApiError};

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// The authenticated caller. Taking it as a handler argument gates the route.
#[derive(Debug, Clone)]
pub struct Caller {
  pub username: String,
}

/// Resolve the caller from `Authorization: Basic …` or fail
/// [`ApiError::Unauthenticated`].
pub fn resolve_caller(headers: &HeaderMap, config: &AuthConfig) -> Result<Caller, ApiError> {
  let encoded = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(ApiError::Unauthenticated)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthenticated)?;
  let creds = String::from_utf8(decoded).map_err(|_| ApiError::Unauthenticated)?;
  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthenticated)?;

  if username != config.username {
    return Err(ApiError::Unauthenticated);
  }

  let parsed_hash =
    PasswordHash::new(&config.password_hash).map_err(|_| ApiError::Unauthenticated)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthenticated)?;

  Ok(Caller { username: username.to_owned() })
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: ClientStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let caller = resolve_caller(&parts.headers, &state.auth);
    if caller.is_err() {
      tracing::debug!(uri = %parts.uri, "rejected unauthenticated request");
    }
    caller
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tests::{basic, test_auth};

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, value.parse().unwrap());
    h
  }

  #[test]
  fn correct_credentials_resolve_the_caller() {
    let auth = test_auth("secret");
    let caller = resolve_caller(&headers(&basic("clerk", "secret")), &auth).unwrap();
    assert_eq!(caller.username, "clerk");
  }

  #[test]
  fn wrong_password_or_user_is_rejected() {
    let auth = test_auth("secret");
    for value in [basic("clerk", "nope"), basic("someone", "secret")] {
      assert!(matches!(
        resolve_caller(&headers(&value), &auth),
        Err(ApiError::Unauthenticated)
      ));
    }
  }

  #[test]
  fn missing_or_malformed_header_is_rejected() {
    let auth = test_auth("secret");
    assert!(resolve_caller(&HeaderMap::new(), &auth).is_err());
    assert!(resolve_caller(&headers("Basic !!!not-base64!!!"), &auth).is_err());
    assert!(resolve_caller(&headers("Bearer abc"), &auth).is_err());
  }
}
