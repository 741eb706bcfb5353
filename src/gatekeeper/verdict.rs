//! Gatekeeper outcomes and their HTTP renderings.

use axum::http::header::{HeaderMap, HeaderValue, LOCATION, RETRY_AFTER};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// What to do with a request.
#[derive(Debug)]
pub enum Verdict {
    /// Path is outside the gatekeeper's reach; forward untouched.
    Pass,
    /// Send the client to the https URL.
    Redirect(String),
    /// Terminal rejection.
    Reject(Rejection),
    /// Forward downstream and stamp these headers on the response.
    Forward(HeaderMap),
}

impl Verdict {
    /// Metric label.
    pub fn outcome(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Redirect(_) => "redirect",
            Verdict::Reject(Rejection::InvalidHost) => "invalid_host",
            Verdict::Reject(Rejection::TooManyRequests { .. }) => "rate_limited",
            Verdict::Reject(Rejection::Unauthorized) => "unauthorized",
            Verdict::Forward(_) => "forward",
        }
    }
}

/// Terminal policy rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidHost,
    TooManyRequests { retry_after_secs: u64 },
    Unauthorized,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::InvalidHost => (StatusCode::BAD_REQUEST, "Invalid Host").into_response(),
            Rejection::TooManyRequests { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, HeaderValue::from(retry_after_secs))],
                "Too Many Requests",
            )
                .into_response(),
            Rejection::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
        }
    }
}

/// 301 to `location`.
pub fn permanent_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::MOVED_PERMANENTLY, [(LOCATION, value)]).into_response(),
        Err(_) => Rejection::InvalidHost.into_response(),
    }
}
