use crate::AppState;
use crate::api::error::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

/// Authentication gate. Resolves the session cookie (or a bearer token for
/// API clients) and exposes the acting user's `SessionClaims` to handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(&state, req.headers()).ok_or(AppError::Unauthenticated)?;
    let claims = state.sessions.resolve(&token).await?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn session_token(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(state.sessions.cookie_name()) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}
