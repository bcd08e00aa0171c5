//! Checkout-success redirect rule and marker cookie

use axum::{
    extract::Query,
    http::{header, HeaderMap, HeaderValue, Uri},
};
use serde::Deserialize;

use crate::locale::LocaleRouting;

/// Cookie set by the auth flow once a session has been established
pub const AUTH_HINT_COOKIE: &str = "auth-hint";

/// Cookie carrying the "just paid" context across the redirect
pub const CHECKOUT_SUCCESS_COOKIE: &str = "checkout-success";

/// Marker cookie as written: root path, ten minutes, lax, not HttpOnly
const CHECKOUT_MARKER_COOKIE: &str = "checkout-success=1; Path=/; Max-Age=600; SameSite=Lax";

/// Query parameter value that triggers the flow
pub const CHECKOUT_SUCCESS: &str = "success";

/// Page an authenticated user lands on after paying
const HOME_PATH: &str = "/home";

/// Outcome of running a request through the checkout rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Not triggered, forward the request untouched
    PassThrough,
    /// Triggered, forward the request and attach the marker cookie
    PassThroughWithCookie,
    /// Triggered, redirect to the target and attach the marker cookie
    Redirect(String),
}

impl CheckoutOutcome {
    /// Evaluate the rule for one request
    pub fn evaluate(
        routing: &LocaleRouting,
        path: &str,
        has_auth_hint: bool,
        checkout: Option<&str>,
    ) -> Self {
        if checkout != Some(CHECKOUT_SUCCESS) {
            return CheckoutOutcome::PassThrough;
        }

        if should_redirect_on_checkout_success(routing, path, has_auth_hint, checkout) {
            let locale = routing
                .resolve_locale(path)
                .unwrap_or_else(|| routing.default_locale());
            CheckoutOutcome::Redirect(routing.localize(locale, HOME_PATH))
        } else {
            CheckoutOutcome::PassThroughWithCookie
        }
    }

    /// Whether the marker cookie goes on the response
    pub fn sets_marker_cookie(&self) -> bool {
        !matches!(self, CheckoutOutcome::PassThrough)
    }
}

/// True iff the checkout marker is `success`, the path is a locale root and
/// the client carries the auth hint
pub fn should_redirect_on_checkout_success(
    routing: &LocaleRouting,
    path: &str,
    has_auth_hint: bool,
    checkout: Option<&str>,
) -> bool {
    checkout == Some(CHECKOUT_SUCCESS) && routing.is_locale_root(path) && has_auth_hint
}

#[derive(Debug, Deserialize)]
struct CheckoutQuery {
    checkout: Option<String>,
}

/// Value of the `checkout` query parameter; unparsable queries count as absent
pub fn checkout_param(uri: &Uri) -> Option<String> {
    Query::<CheckoutQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(query)| query.checkout)
}

/// Whether any `Cookie` header carries a cookie with this name
pub fn has_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.split('=').next())
        .any(|cookie_name| cookie_name.trim() == name)
}

/// `Set-Cookie` value for the checkout marker; readable by client script
pub fn checkout_marker_cookie() -> HeaderValue {
    HeaderValue::from_static(CHECKOUT_MARKER_COOKIE)
}
