use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{debug, info};

use crate::auth::credentials::Credentials;
use crate::auth::error::AuthError;
use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;
use crate::utils::constants::{
    MSG_AUTHENTICATED, MSG_AUTH_FAILED, MSG_MISSING_CREDENTIALS, PROTECTED_API_PATH,
};

static UNMATCHED_ROUTE: &str = "unmatched";

pub fn router() -> Router<AppState> {
    Router::new().route(PROTECTED_API_PATH, get(protected))
}

/// Basic credentials are exchanged for a (possibly cached) access token.
async fn protected(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let result = match Credentials::from_headers(&headers) {
        Some(credentials) => state.gateway.obtain_token(&credentials).await.map(|_| ()),
        None => Err(AuthError::MissingCredentials),
    };

    match result {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": MSG_AUTHENTICATED }))).into_response(),
        Err(e) => {
            debug!(error = %e, "request unauthorized");
            unauthorized(e)
        }
    }
}

fn unauthorized(e: AuthError) -> Response {
    let message = match e {
        AuthError::MissingCredentials => MSG_MISSING_CREDENTIALS,
        AuthError::AuthFailure => MSG_AUTH_FAILED,
    };
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
}

/// Log every incoming request and count it by route and status.
pub async fn log_requests(req: Request, next: Next) -> Response {
    info!("Incoming request: {} {}", req.method(), req.uri());
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());

    let response = next.run(req).await;

    get_metrics()
        .await
        .http_requests
        .with_label_values(&[route.as_str(), response.status().as_str()])
        .inc();
    response
}
