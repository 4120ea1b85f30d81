use super::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::{error, info, warn};

/// GET /plugins/:plugin/main
/// Serve the monitoring page to authenticated users, redirect others to login
pub async fn main_page(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let token = session_token(&headers, &state.plugin.session_cookie);

    let user_id = match token {
        Some(token) => state.user_for(&token).await,
        None => None,
    };

    let Some(user_id) = user_id else {
        warn!("Unauthenticated request for monitoring page, redirecting to login");
        return redirect_found(&state.plugin.login_path);
    };

    let index = state.plugin.web_root.join("index.html");

    match tokio::fs::read_to_string(&index).await {
        Ok(page) => {
            info!("Serving monitoring page to user {}", user_id);
            Html(page).into_response()
        }
        Err(e) => {
            error!("Failed to read {}: {}", index.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Page unavailable").into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// `302 Found` redirect
fn redirect_found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Extract a named cookie value from the request headers
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
