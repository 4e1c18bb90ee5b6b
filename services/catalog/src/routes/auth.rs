//! Login, OAuth connect, and logout route handlers

use askama::Template;
use axum::{
    Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::middleware::{clear_current_user, push_flash, set_current_user};
use crate::models::{CurrentUser, NewUser, session_keys};
use crate::oauth::{OAuthError, OAuthProvider, OAuthUserProfile, generate_state_token};
use crate::routes::render;
use crate::state::AppState;

/// Login page template, with the CSRF state token embedded for the
/// provider buttons.
#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    state: String,
}

/// Welcome page rendered after a successful login.
#[derive(Template)]
#[template(path = "welcome.html")]
struct WelcomeTemplate {
    name: String,
    picture: String,
}

/// Query parameters carried by the connect endpoints.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub state: Option<String>,
}

/// Login page: issues a fresh CSRF state token and stores it in the
/// session before rendering.
pub async fn show_login(session: Session) -> Result<Html<String>, CatalogError> {
    let state = generate_state_token();

    session
        .insert(session_keys::OAUTH_STATE, &state)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store state token: {e}");
            CatalogError::InternalServerError
        })?;

    render(&LoginTemplate { state })
}

/// Google OAuth2 login: the request body is the one-time authorization
/// code obtained by the login page.
pub async fn gconnect(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ConnectQuery>,
    body: String,
) -> Result<Response, CatalogError> {
    verify_state(&session, query.state.as_deref()).await?;

    let (profile, access_token) = state.google_oauth.login(body.trim().to_string()).await?;

    // Same Google identity logging in again is a no-op.
    if let Ok(Some(current)) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
    {
        if current.provider == OAuthProvider::Google && current.provider_user_id == profile.id {
            return Ok(
                Json(json!({"message": "Current user is already connected."})).into_response(),
            );
        }
    }

    complete_login(&state, &session, profile, access_token).await
}

/// Facebook OAuth2 login: the request body is the short-lived access
/// token obtained by the login page.
pub async fn fbconnect(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ConnectQuery>,
    body: String,
) -> Result<Response, CatalogError> {
    verify_state(&session, query.state.as_deref()).await?;

    let (profile, access_token) = state.facebook_oauth.login(body.trim()).await?;

    complete_login(&state, &session, profile, access_token).await
}

/// Logout: attempt provider-side revocation, then clear the session
/// identity either way.
pub async fn disconnect(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, CatalogError> {
    let current = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten();

    match current {
        Some(current) => {
            let revocation = match current.provider {
                OAuthProvider::Google => state.google_oauth.revoke(&current.access_token).await,
                OAuthProvider::Facebook => {
                    state
                        .facebook_oauth
                        .revoke(&current.provider_user_id, &current.access_token)
                        .await
                }
            };
            if let Err(e) = revocation {
                // Local logout proceeds even if the provider call fails.
                warn!("Provider revocation failed: {e}");
            }

            clear_current_user(&session).await.map_err(|e| {
                tracing::error!("Failed to clear session: {e}");
                CatalogError::InternalServerError
            })?;

            info!("User {} logged out", current.id);
            push_flash(&session, "You have been logged out.").await;
        }
        None => {
            push_flash(&session, "ERROR: Not logged in.").await;
        }
    }

    Ok(Redirect::to("/restaurants"))
}

/// Check the submitted CSRF state token against the one issued to this
/// session. Fails closed before any provider call.
async fn verify_state(session: &Session, submitted: Option<&str>) -> Result<(), CatalogError> {
    let issued: Option<String> = session
        .get(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();

    match (issued, submitted) {
        (Some(issued), Some(submitted)) if issued == submitted => Ok(()),
        _ => Err(OAuthError::StateMismatch.into()),
    }
}

/// Resolve or create the local user, cache the identity in the session,
/// and render the welcome page.
async fn complete_login(
    state: &AppState,
    session: &Session,
    profile: OAuthUserProfile,
    access_token: String,
) -> Result<Response, CatalogError> {
    let user = state
        .user_repository
        .find_or_create(&NewUser {
            name: profile.name,
            email: profile.email,
            picture: profile.picture,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve user: {e}");
            CatalogError::InternalServerError
        })?;

    let current = CurrentUser {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        picture: user.picture.clone(),
        provider: profile.provider,
        provider_user_id: profile.id,
        access_token,
    };

    set_current_user(session, &current).await.map_err(|e| {
        tracing::error!("Failed to store session identity: {e}");
        CatalogError::InternalServerError
    })?;

    info!(
        "User {} logged in via {}",
        user.id,
        current.provider.as_str()
    );
    push_flash(session, &format!("you are now logged in as {}", user.name)).await;

    let welcome = WelcomeTemplate {
        name: user.name,
        picture: user.picture,
    };
    Ok(render(&welcome)?.into_response())
}
