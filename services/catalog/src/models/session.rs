//! Session identity model and session key constants

use serde::{Deserialize, Serialize};

use crate::oauth::OAuthProvider;

/// Keys under which values are stored in the cookie session.
pub mod session_keys {
    /// The logged-in identity ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
    /// The CSRF state token issued by the login page.
    pub const OAUTH_STATE: &str = "oauth_state";
    /// One-shot flash messages shown on the next rendered page.
    pub const FLASHES: &str = "flashes";
}

/// Identity cached in the session after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Local user id (owner checks compare against this).
    pub id: i64,
    pub name: String,
    pub email: String,
    pub picture: String,
    /// Which provider authenticated this session.
    pub provider: OAuthProvider,
    /// The provider-side user id (Google sub / Facebook id).
    pub provider_user_id: String,
    /// Provider access token, kept for logout revocation.
    pub access_token: String,
}
