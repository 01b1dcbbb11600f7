//! Basic auth gate for every route.
//!
//! A single username/password pair, compared in constant time. Missing or
//! wrong credentials get a 401 with a challenge; a header that cannot be
//! decoded gets a 400.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::{Engine as _, engine::general_purpose};

use crate::config::AuthConfig;

/// Result of checking a request's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials match
    Granted,
    /// No `Authorization` header, another scheme, or wrong credentials
    Denied,
    /// Basic credentials that cannot be decoded
    Malformed(&'static str),
}

/// Configured credentials and the challenge sent on denial.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
    challenge: HeaderValue,
}

impl BasicAuth {
    /// Create a gate for one credential pair.
    pub fn new(username: &str, password: &str, realm: &str) -> Self {
        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm))
            .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
        Self {
            username: username.to_string(),
            password: password.to_string(),
            challenge,
        }
    }

    /// Create a gate from configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.username, &config.password, &config.realm)
    }

    /// `WWW-Authenticate` value for 401 responses.
    pub fn challenge(&self) -> &HeaderValue {
        &self.challenge
    }

    /// Check an `Authorization` header value.
    pub fn check(&self, header: Option<&HeaderValue>) -> AuthOutcome {
        let Some(header) = header else {
            return AuthOutcome::Denied;
        };
        let Ok(header) = header.to_str() else {
            return AuthOutcome::Malformed("Invalid basic auth credentials");
        };

        match decode_basic(header) {
            Ok(Some((username, password))) => {
                // Evaluate both comparisons regardless of the first result.
                let user_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
                let pass_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
                if user_ok & pass_ok {
                    AuthOutcome::Granted
                } else {
                    AuthOutcome::Denied
                }
            }
            Ok(None) => AuthOutcome::Denied,
            Err(reason) => AuthOutcome::Malformed(reason),
        }
    }
}

/// Decode `Basic <base64(user:pass)>`.
///
/// Returns `Ok(None)` for other schemes.
pub fn decode_basic(header: &str) -> Result<Option<(String, String)>, &'static str> {
    let (scheme, credentials) = header.trim().split_once(' ').unwrap_or((header.trim(), ""));
    if !scheme.eq_ignore_ascii_case("basic") {
        return Ok(None);
    }

    let decoded = general_purpose::STANDARD
        .decode(credentials.trim())
        .map_err(|_| "Invalid basic auth credentials")?;
    let decoded = String::from_utf8(decoded).map_err(|_| "Invalid basic auth credentials")?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or("Invalid basic auth credentials")?;

    Ok(Some((username.to_string(), password.to_string())))
}

/// Byte comparison whose running time depends only on the lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Middleware rejecting requests without valid credentials.
pub async fn basic_auth_middleware(
    State(auth): State<Arc<BasicAuth>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match auth.check(req.headers().get(AUTHORIZATION)) {
        AuthOutcome::Granted => next.run(req).await,
        AuthOutcome::Malformed(reason) => {
            log::debug!("Rejecting {} {}: {}", req.method(), req.uri().path(), reason);
            (StatusCode::BAD_REQUEST, reason).into_response()
        }
        AuthOutcome::Denied => {
            log::debug!("Challenging {} {}", req.method(), req.uri().path());
            let mut resp = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
            resp.headers_mut().insert(WWW_AUTHENTICATE, auth.challenge().clone());
            resp
        }
    }
}
