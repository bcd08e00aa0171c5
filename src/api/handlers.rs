//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    routes::render_sitemap,
    state::{clamp_duration_ms, AppState, SessionError},
};
use super::{
    middleware::RequestLocale,
    responses::{DelayResponse, ErrorResponse, HealthResponse, PageResponse, StatusResponse},
};

/// Body of a delay start request
#[derive(Debug, Deserialize)]
pub struct StartDelayRequest {
    #[serde(default, deserialize_with = "lenient_duration_ms")]
    pub total_ms: i64,
}

/// Accept any JSON value; anything that is not a usable number becomes 0
fn lenient_duration_ms<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .unwrap_or_else(|| clamp_duration_ms(n.as_f64().unwrap_or(0.0))),
        _ => 0,
    })
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found(message))).into_response()
}

/// Handle GET on any page path - resolve it through the route table
pub async fn page_handler(
    State(state): State<Arc<AppState>>,
    locale: Option<Extension<RequestLocale>>,
    uri: Uri,
) -> Response {
    let path = uri.path();
    let Some(Extension(RequestLocale(locale))) = locale else {
        debug!("No locale for {}", path);
        return not_found(format!("No page at {}", path));
    };

    let page_path = state.routing.strip_prefix(&locale, path);
    match state.routes.lookup(page_path) {
        Some(found) => {
            debug!("Resolved {} to {:?} ({})", path, found.page, locale);
            let body = PageResponse {
                locale: locale.clone(),
                page: found.page,
                pattern: found.pattern,
                params: found.params,
                path: page_path.to_string(),
            };
            ([(header::CONTENT_LANGUAGE, locale)], Json(body)).into_response()
        }
        None => not_found(format!("No page at {}", path)),
    }
}

/// Handle POST /api/sessions/:session_id/delay - Start or restart a session timer
///
/// A body whose duration cannot be read as a JSON number (including numbers
/// outside the `f64` range) starts an inactive, zero-length timer.
pub async fn start_delay_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Result<Json<StartDelayRequest>, JsonRejection>,
) -> Response {
    let total_ms = match body {
        Ok(Json(request)) => request.total_ms,
        Err(rejection @ (JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_))) => {
            warn!("Unreadable delay duration for session {}: {}", session_id, rejection.body_text());
            0
        }
        Err(rejection) => return rejection.into_response(),
    };

    match state.start_delay(&session_id, total_ms) {
        Ok(delay) => Json(DelayResponse::new(session_id, delay)).into_response(),
        Err(e @ SessionError::InvalidSessionId(_)) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(e.to_string()))).into_response()
        }
        Err(e @ SessionError::TooManySessions(_)) => {
            warn!("Refusing new playback session: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(ErrorResponse::unavailable(e.to_string()))).into_response()
        }
        Err(e @ SessionError::Lock(_)) => {
            error!("Failed to start delay: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle GET /api/sessions/:session_id/delay - Poll a session timer
pub async fn poll_delay_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Response {
    match state.poll_delay(&session_id) {
        Ok(Some(delay)) => Json(DelayResponse::new(session_id, delay)).into_response(),
        Ok(None) => not_found(format!("Unknown session {}", session_id)),
        Err(e) => {
            error!("Failed to poll delay: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle DELETE /api/sessions/:session_id/delay - Clear a session timer
pub async fn clear_delay_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Response {
    match state.clear_delay(&session_id) {
        Ok(Some(delay)) => {
            info!("Delay cleared for session {}", session_id);
            Json(DelayResponse::new(session_id, delay)).into_response()
        }
        Ok(None) => not_found(format!("Unknown session {}", session_id)),
        Err(e) => {
            error!("Failed to clear delay: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle GET /sitemap.xml - Every static page in every locale
pub async fn sitemap_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let xml = render_sitemap(&state.base_url, &state.routing, &state.routes);
    ([(header::CONTENT_TYPE, "application/xml")], xml)
}

/// Handle GET /status - Return current service status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let active_sessions = match state.session_count() {
        Ok(count) => count,
        Err(e) => {
            error!("Failed to count sessions: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(Json(StatusResponse {
        locales: state.routing.locales().to_vec(),
        default_locale: state.routing.default_locale().to_string(),
        prefix_mode: state.routing.prefix_mode(),
        routes: state.routes.len(),
        active_sessions,
        uptime: state.get_uptime(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> i64 {
        serde_json::from_str::<StartDelayRequest>(body).unwrap().total_ms
    }

    #[test]
    fn test_lenient_duration_body() {
        assert_eq!(parse(r#"{"total_ms": 1500}"#), 1500);
        assert_eq!(parse(r#"{"total_ms": 1500.7}"#), 1500);
        assert_eq!(parse(r#"{"total_ms": -20}"#), -20);
        assert_eq!(parse(r#"{"total_ms": "soon"}"#), 0);
        assert_eq!(parse(r#"{"total_ms": null}"#), 0);
        assert_eq!(parse(r#"{}"#), 0);
    }

    #[test]
    fn test_huge_durations_saturate() {
        assert_eq!(parse(r#"{"total_ms": 1e30}"#), i64::MAX);
        assert_eq!(parse(r#"{"total_ms": 99999999999999999999}"#), i64::MAX);
    }
}
