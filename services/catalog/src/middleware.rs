//! Session extractors and the ownership gate
//!
//! Provides extractors for requiring a logged-in identity in route
//! handlers, one-shot flash messages, and the owner check applied to
//! every mutating operation.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::CatalogError;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in user.
///
/// Anonymous requests are redirected to the login page, matching the
/// behavior of every mutating route.
pub struct RequireAuth(pub CurrentUser);

/// Rejection returned when authentication is required but missing.
pub struct RedirectToLogin;

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = RedirectToLogin;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The session is placed in extensions by SessionManagerLayer
        let session = parts.extensions.get::<Session>().ok_or(RedirectToLogin)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(RedirectToLogin)?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike [`RequireAuth`], this never rejects; listing pages use it to
/// choose between the public and owner-aware views.
pub struct OptionalAuth(pub Option<CurrentUser>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// The ownership gate: only the recorded owner of a record may mutate
/// or delete it.
pub fn ensure_owner(user: &CurrentUser, owner_id: i64) -> Result<(), CatalogError> {
    if user.id == owner_id {
        Ok(())
    } else {
        Err(CatalogError::Forbidden)
    }
}

/// Store the logged-in identity in the session.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Clear the logged-in identity from the session (logout).
pub async fn clear_current_user(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session
        .remove::<String>(session_keys::OAUTH_STATE)
        .await?;
    Ok(())
}

/// Record a one-shot flash message shown on the next rendered page.
///
/// Session failures here are not worth failing the request over.
pub async fn push_flash(session: &Session, message: &str) {
    let mut flashes: Vec<String> = session
        .get(session_keys::FLASHES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    flashes.push(message.to_string());

    if let Err(e) = session.insert(session_keys::FLASHES, flashes).await {
        tracing::warn!("Failed to store flash message: {e}");
    }
}

/// Take and clear the pending flash messages.
pub async fn take_flashes(session: &Session) -> Vec<String> {
    session
        .remove::<Vec<String>>(session_keys::FLASHES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
