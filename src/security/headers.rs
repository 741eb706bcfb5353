//! Security response headers.
//!
//! The header set is fixed at compile time and stamped onto every response
//! the gatekeeper forwards. Same-named headers from downstream are
//! overwritten.

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_SECURITY_POLICY, EXPIRES, PRAGMA,
    REFERRER_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
    X_XSS_PROTECTION,
};

pub const CSP: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' https://js.stripe.com https://www.googletagmanager.com; \
style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
font-src 'self' https://fonts.gstatic.com; \
img-src 'self' data: blob: https://www.googletagmanager.com; \
media-src 'self'; \
object-src 'none'; \
base-uri 'self'; \
form-action 'self'; \
frame-src 'self' https://js.stripe.com; \
connect-src 'self' https://api.stripe.com https://appcenter.intuit.com https://oauth.platform.intuit.com; \
worker-src 'self' blob:";

pub const PERMISSIONS_POLICY: &str =
    "camera=(), microphone=(), geolocation=(), interest-cohort=(), payment=(self), usb=()";

pub const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");
pub const X_SECURITY_LEVEL: HeaderName = HeaderName::from_static("x-security-level");
pub const PERMISSIONS_POLICY_HEADER: HeaderName = HeaderName::from_static("permissions-policy");

/// The static security header table, identification headers last.
pub const SECURITY_HEADERS: [(HeaderName, &str); 9] = [
    (X_XSS_PROTECTION, "1; mode=block"),
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (X_FRAME_OPTIONS, "DENY"),
    (REFERRER_POLICY, "strict-origin-when-cross-origin"),
    (CONTENT_SECURITY_POLICY, CSP),
    (
        STRICT_TRANSPORT_SECURITY,
        "max-age=31536000; includeSubDomains; preload",
    ),
    (PERMISSIONS_POLICY_HEADER, PERMISSIONS_POLICY),
    (X_POWERED_BY, "Active Back Office"),
    (X_SECURITY_LEVEL, "production"),
];

pub const NO_STORE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// Insert the full security header set.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

/// Disable every layer of caching.
pub fn apply_no_cache(headers: &mut HeaderMap) {
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
}

/// Copy `stamp` over `target`, replacing existing values.
pub fn merge_into(target: &mut HeaderMap, stamp: HeaderMap) {
    let mut current = None;
    for (name, value) in stamp {
        if let Some(name) = name {
            target.remove(&name);
            current = Some(name);
        }
        if let Some(name) = &current {
            target.append(name.clone(), value);
        }
    }
}
