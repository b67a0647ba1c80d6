//! Session middleware
//!
//! Resolves the `sid` cookie to the caller's identity. Requests without a
//! valid session pass through anonymously; handlers decide whether that is
//! allowed by extracting `Option<Extension<CurrentSession>>`.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use crate::{
    error::ApiError,
    models::{CurrentSession, SessionUser},
    session::SESSION_COOKIE_NAME,
    state::AppState,
};

/// Attach the current session, if any, to the request extensions
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string()) {
        let user = state.session_manager.get_session(&token).await.map_err(|e| {
            error!("Failed to load session: {}", e);
            ApiError::InternalServerError
        })?;

        if let Some(user) = user {
            req.extensions_mut().insert(CurrentSession { token, user });
        }
    }

    Ok(next.run(req).await)
}

/// Identity of the session a handler extracted, if any
pub fn identity(session: &Option<axum::Extension<CurrentSession>>) -> Option<&SessionUser> {
    session.as_ref().map(|axum::Extension(current)| &current.user)
}
