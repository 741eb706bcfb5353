//! Axum middleware wrapping `Gatekeeper::evaluate`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::gatekeeper::verdict::permanent_redirect;
use crate::gatekeeper::{Gatekeeper, RequestInfo, Verdict};
use crate::observability::metrics;
use crate::security::headers::merge_into;

/// Run the gatekeeper in front of the rest of the stack.
pub async fn gatekeeper_middleware(
    State(gatekeeper): State<Arc<Gatekeeper>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let info = RequestInfo::from_request(
        &request,
        gatekeeper.session_cookies(),
        gatekeeper.trusted_proxies(),
    );
    let verdict = gatekeeper.evaluate(&info);
    metrics::record_decision(verdict.outcome());

    match verdict {
        Verdict::Pass => next.run(request).await,
        Verdict::Forward(stamp) => {
            let mut response = next.run(request).await;
            merge_into(response.headers_mut(), stamp);
            response
        }
        Verdict::Redirect(location) => {
            tracing::debug!(path = %info.path, location = %location, "Redirecting to https");
            permanent_redirect(&location)
        }
        Verdict::Reject(rejection) => {
            tracing::debug!(
                path = %info.path,
                client = %info.client_ip,
                rejection = ?rejection,
                "Request rejected"
            );
            rejection.into_response()
        }
    }
}

/// Install the gatekeeper on every route of `router`.
pub fn protect<S>(router: Router<S>, gatekeeper: Arc<Gatekeeper>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gatekeeper, gatekeeper_middleware))
}
