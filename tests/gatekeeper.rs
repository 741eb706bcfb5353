//! Gatekeeper behavior through the axum middleware.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use active_gatekeeper::config::{GatekeeperConfig, Mode};
use active_gatekeeper::gatekeeper::Gatekeeper;
use active_gatekeeper::security::headers::SECURITY_HEADERS;
use active_gatekeeper::security::ManualClock;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode};

mod common;

fn production() -> GatekeeperConfig {
    GatekeeperConfig {
        mode: Mode::Production,
        ..Default::default()
    }
}

fn peer(addr: &str) -> ConnectInfo<SocketAddr> {
    ConnectInfo(addr.parse().unwrap())
}

fn get_from(path: &str, addr: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .header("host", "app.activebackoffice.com")
        .header("x-forwarded-proto", "https")
        .extension(peer(addr))
}

fn get(path: &str) -> axum::http::request::Builder {
    get_from(path, "10.0.0.5:40000")
}

#[tokio::test]
async fn test_rate_limit_scenario() {
    let clock = ManualClock::new();
    let gatekeeper = Arc::new(Gatekeeper::with_clock(
        &production(),
        Arc::new(clock.clone()),
    ));
    let app = common::app(gatekeeper.clone());

    for _ in 0..1000 {
        let res = common::send(&app, get("/dashboard").body(Body::empty()).unwrap()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get("retry-after").is_none());
    }

    clock.advance(Duration::from_secs(120));
    let res = common::send(&app, get("/dashboard").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.headers()["retry-after"], "900");
    assert_eq!(common::body_text(res).await, "Too Many Requests");

    // Another client is unaffected.
    let res = common::send(
        &app,
        get_from("/dashboard", "10.0.0.6:40000")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // A fresh window after expiry.
    clock.advance(Duration::from_secs(15 * 60));
    let res = common::send(&app, get("/dashboard").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(gatekeeper.limiter().count("10.0.0.5"), Some(1));
}

fn capped(max_requests: u32) -> GatekeeperConfig {
    let mut config = production();
    config.rate_limit.max_requests = max_requests;
    config
}

#[tokio::test]
async fn test_forwarding_headers_cannot_rotate_identity() {
    let gatekeeper = Arc::new(Gatekeeper::new(&capped(2)));
    let app = common::app(gatekeeper.clone());

    let mut admitted = 0;
    for i in 0..50 {
        let res = common::send(
            &app,
            get_from("/", "203.0.113.7:51000")
                .header("x-real-ip", format!("198.51.100.{}", i))
                .header("x-forwarded-for", format!("192.0.2.{}", i))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        if res.status() == StatusCode::OK {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 2);
    assert_eq!(gatekeeper.limiter().len(), 1);
    assert_eq!(gatekeeper.limiter().count("203.0.113.7"), Some(2));
}

#[tokio::test]
async fn test_trusted_proxy_forwards_client_identity() {
    let mut config = capped(2);
    config.client_ip.trusted_proxies = vec!["10.0.0.1".to_string()];
    let gatekeeper = Arc::new(Gatekeeper::new(&config));
    let app = common::app(gatekeeper.clone());

    for client in ["198.51.100.1", "198.51.100.2"] {
        for _ in 0..2 {
            let res = common::send(
                &app,
                get_from("/", "10.0.0.1:443")
                    .header("x-real-ip", client)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
        }
    }

    let res = common::send(
        &app,
        get_from("/", "10.0.0.1:443")
            .header("x-forwarded-for", "198.51.100.1, 10.0.0.1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(gatekeeper.limiter().count("198.51.100.1"), Some(2));
    assert_eq!(gatekeeper.limiter().count("10.0.0.1"), None);
}

#[tokio::test]
async fn test_https_redirect_in_production() {
    let app = common::app(Arc::new(Gatekeeper::new(&production())));

    let res = common::send(
        &app,
        Request::builder()
            .uri("/properties/12?view=units")
            .header("host", "app.activebackoffice.com")
            .header("x-forwarded-proto", "http")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        res.headers()["location"],
        "https://app.activebackoffice.com/properties/12?view=units"
    );
}

#[tokio::test]
async fn test_invalid_host_in_production() {
    let app = common::app(Arc::new(Gatekeeper::new(&production())));

    let res = common::send(
        &app,
        Request::builder()
            .uri("/")
            .header("host", "evil.example.com")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::body_text(res).await, "Invalid Host");
}

#[tokio::test]
async fn test_development_accepts_local_hosts() {
    let app = common::app(Arc::new(Gatekeeper::new(&GatekeeperConfig::default())));

    let res = common::send(
        &app,
        Request::builder()
            .uri("/")
            .header("host", "localhost:3000")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_forwarded_responses_carry_security_headers() {
    let app = common::app(Arc::new(Gatekeeper::new(&production())));

    for path in ["/", "/pricing", "/dashboard", "/api/entities", "/setup", "/platform-admin"] {
        let res = common::send(&app, get(path).body(Body::empty()).unwrap()).await;
        assert_eq!(res.status(), StatusCode::OK, "{}", path);
        for (name, value) in SECURITY_HEADERS {
            assert_eq!(res.headers()[&name], value, "{} on {}", name, path);
        }
    }
}

#[tokio::test]
async fn test_cache_suppression() {
    let app = common::app(Arc::new(Gatekeeper::new(&production())));

    for path in ["/dashboard/leases", "/api/users/7"] {
        let res = common::send(&app, get(path).body(Body::empty()).unwrap()).await;
        assert_eq!(
            res.headers()["cache-control"],
            "no-store, no-cache, must-revalidate, proxy-revalidate"
        );
        assert_eq!(res.headers()["pragma"], "no-cache");
        assert_eq!(res.headers()["expires"], "0");
    }

    let res = common::send(&app, get("/about").body(Body::empty()).unwrap()).await;
    assert!(res.headers().get("cache-control").is_none());
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = common::app(Arc::new(Gatekeeper::new(&production())));

    let res = common::send(
        &app,
        get("/api/entities")
            .method(Method::OPTIONS)
            .header("origin", "https://app.activebackoffice.com")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "https://app.activebackoffice.com"
    );
    assert_eq!(res.headers()["access-control-max-age"], "86400");

    let res = common::send(
        &app,
        get("/api/entities")
            .method(Method::OPTIONS)
            .header("origin", "https://evil.example.com")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert!(res.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_static_assets_are_untouched() {
    let app = common::app(Arc::new(Gatekeeper::new(&production())));

    let res = common::send(
        &app,
        Request::builder()
            .uri("/favicon.ico")
            .header("x-forwarded-proto", "http")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-frame-options").is_none());
}

#[tokio::test]
async fn test_enforcement_toggle() {
    let mut config = production();
    config.routes.auth_enforcement = true;
    let app = common::app(Arc::new(Gatekeeper::new(&config)));

    let res = common::send(&app, get("/api/integrations").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = common::send(
        &app,
        get("/api/integrations")
            .header("cookie", "__Secure-abo.session-token=xyz")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // Off by default: the same request passes.
    let app = common::app(Arc::new(Gatekeeper::new(&production())));
    let res = common::send(&app, get("/api/integrations").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status(), StatusCode::OK);
}
