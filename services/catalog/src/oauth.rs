//! OAuth2 integration for Google and Facebook providers
//!
//! Google logins exchange a one-time authorization code posted by the
//! login page; Facebook logins exchange a short-lived access token for
//! a long-lived one. Both end in a verified profile that is upserted
//! into the local user table.

use anyhow::Result;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, TokenResponse, TokenUrl,
    basic::BasicClient,
};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use tracing::info;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/tokeninfo";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";
const GOOGLE_REVOKE_URL: &str = "https://accounts.google.com/o/oauth2/revoke";
const FACEBOOK_GRAPH_URL: &str = "https://graph.facebook.com";

/// OAuth2 provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Facebook,
}

impl OAuthProvider {
    /// Get the provider name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Facebook => "facebook",
        }
    }
}

/// Errors produced by the login and logout flows
///
/// Anything that breaks the chain of trust (state, exchange, audience,
/// identity) aborts the flow before a session is established.
#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("Invalid state parameter")]
    StateMismatch,

    #[error("Failed to upgrade the authorization code: {0}")]
    ExchangeFailed(String),

    #[error("Token error from provider: {0}")]
    Provider(String),

    #[error("Token's client ID does not match the application's")]
    AudienceMismatch,

    #[error("Token's user ID doesn't match the given user ID")]
    IdentityMismatch,

    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// Profile information returned by a provider after a verified login
#[derive(Debug, Clone)]
pub struct OAuthUserProfile {
    /// Provider-side user id (Google sub / Facebook id)
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: String,
    pub provider: OAuthProvider,
}

/// Generate the random CSRF state token bound to a login attempt.
///
/// 32 alphanumeric characters, issued by the login page and checked by
/// both connect endpoints before anything else happens.
pub fn generate_state_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Paths to the local JSON credential files
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub google_secrets_path: String,
    pub facebook_secrets_path: String,
}

impl OAuthSettings {
    /// Create OAuthSettings from environment variables
    pub fn from_env() -> Self {
        Self {
            google_secrets_path: env::var("GOOGLE_CLIENT_SECRETS")
                .unwrap_or_else(|_| "client_secrets.json".to_string()),
            facebook_secrets_path: env::var("FACEBOOK_CLIENT_SECRETS")
                .unwrap_or_else(|_| "fb_client_secrets.json".to_string()),
        }
    }
}

/// Credential files wrap their payload in a `web` object.
#[derive(Debug, Clone, Deserialize)]
struct SecretsFile<T> {
    web: T,
}

/// Google client credentials (`client_secrets.json`)
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl GoogleCredentials {
    /// Parse credentials from the JSON credential file contents
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: SecretsFile<GoogleCredentials> = serde_json::from_str(raw)?;
        Ok(file.web)
    }

    /// Load credentials from a local JSON file
    pub fn load(path: &str) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Facebook app credentials (`fb_client_secrets.json`)
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookCredentials {
    pub app_id: String,
    pub app_secret: String,
}

impl FacebookCredentials {
    /// Parse credentials from the JSON credential file contents
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: SecretsFile<FacebookCredentials> = serde_json::from_str(raw)?;
        Ok(file.web)
    }

    /// Load credentials from a local JSON file
    pub fn load(path: &str) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Google tokeninfo response, used for audience verification
#[derive(Debug, Deserialize)]
struct TokenInfo {
    user_id: Option<String>,
    issued_to: Option<String>,
    error: Option<String>,
}

/// Google userinfo response
#[derive(Debug, Deserialize)]
struct GoogleUser {
    id: String,
    name: String,
    email: String,
    picture: String,
}

/// OAuth2 client for Google one-time-code logins
#[derive(Clone)]
pub struct GoogleOAuth {
    client: BasicClient,
    client_id: String,
    http: reqwest::Client,
}

impl GoogleOAuth {
    /// Create a new OAuth2 client for Google
    pub fn new(credentials: GoogleCredentials) -> Result<Self> {
        let client = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret)),
            AuthUrl::new(GOOGLE_AUTH_URL.to_string())?,
            Some(TokenUrl::new(GOOGLE_TOKEN_URL.to_string())?),
        );

        Ok(Self {
            client,
            client_id: credentials.client_id,
            http: reqwest::Client::new(),
        })
    }

    /// Run the full Google login: exchange the one-time code, verify the
    /// token audience, fetch the profile, and cross-check identities.
    ///
    /// Returns the verified profile and the access token (kept for
    /// logout revocation).
    pub async fn login(&self, code: String) -> Result<(OAuthUserProfile, String), OAuthError> {
        let access_token = self.exchange_code(code).await?;
        let token_user_id = self.verify_token(&access_token).await?;
        let profile = self.user_profile(&access_token).await?;

        if profile.id != token_user_id {
            return Err(OAuthError::IdentityMismatch);
        }

        Ok((profile, access_token))
    }

    /// Exchange the one-time authorization code for an access token
    async fn exchange_code(&self, code: String) -> Result<String, OAuthError> {
        info!("Exchanging Google authorization code for access token");

        // The login page obtains the code via the postmessage flow, so
        // the token endpoint expects that literal redirect URI.
        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .add_extra_param("redirect_uri", "postmessage")
            .request_async(oauth2::reqwest::async_http_client)
            .await
            .map_err(|e| OAuthError::ExchangeFailed(e.to_string()))?;

        Ok(token_response.access_token().secret().clone())
    }

    /// Verify the access token against the tokeninfo endpoint.
    ///
    /// The token must carry no error and must have been issued to this
    /// application's client id. Returns the token's user id for the
    /// identity cross-check.
    async fn verify_token(&self, access_token: &str) -> Result<String, OAuthError> {
        let info: TokenInfo = self
            .http
            .get(GOOGLE_TOKENINFO_URL)
            .query(&[("access_token", access_token)])
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = info.error {
            return Err(OAuthError::Provider(error));
        }

        let issued_to = info
            .issued_to
            .ok_or_else(|| OAuthError::Malformed("tokeninfo missing issued_to".to_string()))?;
        if issued_to != self.client_id {
            return Err(OAuthError::AudienceMismatch);
        }

        info.user_id
            .ok_or_else(|| OAuthError::Malformed("tokeninfo missing user_id".to_string()))
    }

    /// Fetch the Google user profile
    async fn user_profile(&self, access_token: &str) -> Result<OAuthUserProfile, OAuthError> {
        let user: GoogleUser = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .query(&[("access_token", access_token), ("alt", "json")])
            .send()
            .await?
            .json()
            .await?;

        Ok(OAuthUserProfile {
            id: user.id,
            email: user.email,
            name: user.name,
            picture: user.picture,
            provider: OAuthProvider::Google,
        })
    }

    /// Revoke the access token on logout
    pub async fn revoke(&self, access_token: &str) -> Result<(), OAuthError> {
        info!("Revoking Google access token");

        self.http
            .get(GOOGLE_REVOKE_URL)
            .query(&[("token", access_token)])
            .send()
            .await?;

        Ok(())
    }
}

/// Facebook token exchange response
#[derive(Debug, Deserialize)]
struct FacebookTokenExchange {
    access_token: String,
}

/// Facebook userinfo response
#[derive(Debug, Deserialize)]
struct FacebookUser {
    id: String,
    name: String,
    email: Option<String>,
}

/// Facebook portrait response
#[derive(Debug, Deserialize)]
struct FacebookPicture {
    data: FacebookPictureData,
}

#[derive(Debug, Deserialize)]
struct FacebookPictureData {
    url: String,
}

/// OAuth2 client for Facebook access-token logins
#[derive(Clone)]
pub struct FacebookOAuth {
    app_id: String,
    app_secret: String,
    http: reqwest::Client,
}

impl FacebookOAuth {
    /// Create a new OAuth2 client for Facebook
    pub fn new(credentials: FacebookCredentials) -> Self {
        Self {
            app_id: credentials.app_id,
            app_secret: credentials.app_secret,
            http: reqwest::Client::new(),
        }
    }

    /// Run the full Facebook login: upgrade the short-lived token,
    /// fetch the profile and portrait.
    ///
    /// Returns the profile and the long-lived access token (kept for
    /// logout permission deletion).
    pub async fn login(
        &self,
        short_lived_token: &str,
    ) -> Result<(OAuthUserProfile, String), OAuthError> {
        let access_token = self.exchange_token(short_lived_token).await?;
        let user = self.user_info(&access_token).await?;
        let picture = self.user_picture(&access_token).await?;

        let email = user
            .email
            .ok_or_else(|| OAuthError::Malformed("userinfo missing email".to_string()))?;

        Ok((
            OAuthUserProfile {
                id: user.id,
                email,
                name: user.name,
                picture,
                provider: OAuthProvider::Facebook,
            },
            access_token,
        ))
    }

    /// Exchange the short-lived token for a long-lived one
    async fn exchange_token(&self, short_lived_token: &str) -> Result<String, OAuthError> {
        info!("Exchanging Facebook access token");

        let response = self
            .http
            .get(format!("{FACEBOOK_GRAPH_URL}/oauth/access_token"))
            .query(&[
                ("grant_type", "fb_exchange_token"),
                ("client_id", &self.app_id),
                ("client_secret", &self.app_secret),
                ("fb_exchange_token", short_lived_token),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OAuthError::ExchangeFailed(format!(
                "token exchange returned {}",
                response.status()
            )));
        }

        let exchange: FacebookTokenExchange = response
            .json()
            .await
            .map_err(|e| OAuthError::ExchangeFailed(e.to_string()))?;

        Ok(exchange.access_token)
    }

    /// Fetch the Facebook user profile
    async fn user_info(&self, access_token: &str) -> Result<FacebookUser, OAuthError> {
        let user: FacebookUser = self
            .http
            .get(format!("{FACEBOOK_GRAPH_URL}/v2.4/me"))
            .query(&[
                ("access_token", access_token),
                ("fields", "name,id,email"),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(user)
    }

    /// Fetch the user's portrait URL
    async fn user_picture(&self, access_token: &str) -> Result<String, OAuthError> {
        let picture: FacebookPicture = self
            .http
            .get(format!("{FACEBOOK_GRAPH_URL}/v2.4/me/picture"))
            .query(&[
                ("access_token", access_token),
                ("redirect", "0"),
                ("height", "200"),
                ("width", "200"),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(picture.data.url)
    }

    /// Delete the app's permissions for this user on logout
    pub async fn revoke(&self, facebook_id: &str, access_token: &str) -> Result<(), OAuthError> {
        info!("Deleting Facebook permissions for logout");

        self.http
            .delete(format!("{FACEBOOK_GRAPH_URL}/{facebook_id}/permissions"))
            .query(&[("access_token", access_token)])
            .send()
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_token_is_32_alphanumeric_chars() {
        let token = generate_state_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn state_tokens_are_unique_per_attempt() {
        assert_ne!(generate_state_token(), generate_state_token());
    }

    #[test]
    fn google_credentials_parse_from_secrets_file() {
        let raw = r#"{"web": {"client_id": "abc.apps.googleusercontent.com",
                      "client_secret": "s3cret",
                      "redirect_uris": ["postmessage"]}}"#;
        let creds = GoogleCredentials::from_json(raw).expect("valid secrets file");
        assert_eq!(creds.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "s3cret");
    }

    #[test]
    fn facebook_credentials_parse_from_secrets_file() {
        let raw = r#"{"web": {"app_id": "1234567890", "app_secret": "fb-s3cret"}}"#;
        let creds = FacebookCredentials::from_json(raw).expect("valid secrets file");
        assert_eq!(creds.app_id, "1234567890");
        assert_eq!(creds.app_secret, "fb-s3cret");
    }

    #[test]
    fn provider_names() {
        assert_eq!(OAuthProvider::Google.as_str(), "google");
        assert_eq!(OAuthProvider::Facebook.as_str(), "facebook");
    }
}
