//! Locale proxy applied in front of page routes

use std::sync::Arc;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info};

use crate::{
    checkout::{checkout_marker_cookie, checkout_param, has_cookie, CheckoutOutcome, AUTH_HINT_COOKIE},
    state::AppState,
};

/// Locale a page request resolved to, stored as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale(pub String);

/// Resolve the request's locale and run the checkout-success rule.
///
/// Every request ends in one hop: forwarded as-is, forwarded with the marker
/// cookie, or redirected with the marker cookie.
pub async fn locale_proxy(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let checkout = checkout_param(request.uri());
    let has_auth_hint = has_cookie(request.headers(), AUTH_HINT_COOKIE);

    let outcome = CheckoutOutcome::evaluate(&state.routing, &path, has_auth_hint, checkout.as_deref());

    let mut response = match outcome {
        CheckoutOutcome::Redirect(ref target) => {
            info!("Checkout success on {}, redirecting to {}", path, target);
            Redirect::temporary(target).into_response()
        }
        CheckoutOutcome::PassThrough | CheckoutOutcome::PassThroughWithCookie => {
            if let Some(locale) = state.routing.resolve_locale(&path) {
                request.extensions_mut().insert(RequestLocale(locale.to_string()));
            }
            next.run(request).await
        }
    };

    if outcome.sets_marker_cookie() {
        debug!("Attaching checkout marker cookie for {}", path);
        response
            .headers_mut()
            .append(header::SET_COOKIE, checkout_marker_cookie());
    }

    response
}
