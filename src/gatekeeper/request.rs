//! Request metadata the gatekeeper decides on.

use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::header::{HeaderMap, AUTHORIZATION, COOKIE, HOST, ORIGIN, USER_AGENT};
use axum::http::{Method, Request};

/// Identifier shared by every client whose address cannot be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Everything `Gatekeeper::evaluate` looks at, copied out of a request.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub host: Option<String>,
    pub forwarded_proto: Option<String>,
    pub client_ip: String,
    pub user_agent: String,
    pub origin: Option<String>,
    pub has_authorization: bool,
    pub has_session: bool,
}

impl RequestInfo {
    /// Extract metadata from a request. The peer address is taken from
    /// `ConnectInfo` when the server provides it; forwarding headers only
    /// count when that peer is one of `trusted_proxies`.
    pub fn from_request<B>(
        request: &Request<B>,
        session_cookies: &[String],
        trusted_proxies: &[IpAddr],
    ) -> Self {
        let headers = request.headers();
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip());

        let host = header_str(headers, HOST.as_str())
            .map(str::to_string)
            .or_else(|| request.uri().authority().map(|a| a.to_string()));

        Self {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            host,
            forwarded_proto: header_str(headers, X_FORWARDED_PROTO).map(str::to_string),
            client_ip: client_ip(headers, peer, trusted_proxies),
            user_agent: header_str(headers, USER_AGENT.as_str())
                .unwrap_or_default()
                .to_string(),
            origin: header_str(headers, ORIGIN.as_str()).map(str::to_string),
            has_authorization: headers.contains_key(AUTHORIZATION),
            has_session: has_session_cookie(headers, session_cookies),
        }
    }

    /// Host, path and query, for logs.
    pub fn url(&self) -> String {
        let host = self.host.as_deref().unwrap_or_default();
        match &self.query {
            Some(q) => format!("{}{}?{}", host, self.path, q),
            None => format!("{}{}", host, self.path),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Client address: the TCP peer, unless the peer is a trusted proxy, in
/// which case `X-Real-IP` and then the first `X-Forwarded-For` hop are
/// preferred. Header values that do not parse as an IP address are skipped.
/// Without a peer the client is `UNKNOWN_CLIENT`.
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>, trusted_proxies: &[IpAddr]) -> String {
    let Some(peer) = peer else {
        return UNKNOWN_CLIENT.to_string();
    };
    if !trusted_proxies.contains(&peer) {
        return peer.to_string();
    }

    let real_ip = header_str(headers, X_REAL_IP).and_then(parse_ip);
    let forwarded = header_str(headers, X_FORWARDED_FOR)
        .and_then(|s| s.split(',').map(str::trim).find(|hop| !hop.is_empty()))
        .and_then(parse_ip);

    real_ip.or(forwarded).unwrap_or(peer).to_string()
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}

/// True when any `Cookie` header carries a non-empty session cookie.
pub fn has_session_cookie(headers: &HeaderMap, names: &[String]) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| !value.is_empty() && names.iter().any(|n| n == name))
}
