//! Custom error types for the catalog service

use askama::Template;
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::oauth::OAuthError;

/// Custom error type for the catalog service
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The session identity is not the owner of the target record
    #[error("Current user is not authorized")]
    Forbidden,

    /// A record referenced by the request path does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Login flow failure
    #[error(transparent)]
    OAuth(#[from] OAuthError),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

/// Notice page shown when the ownership check fails.
#[derive(Template)]
#[template(path = "notice.html")]
struct NoticeTemplate<'a> {
    message: &'a str,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        match self {
            CatalogError::Forbidden => {
                let notice = NoticeTemplate {
                    message: "Current user is not authorized.",
                };
                let body = notice
                    .render()
                    .unwrap_or_else(|_| "Current user is not authorized.".to_string());
                (StatusCode::FORBIDDEN, Html(body)).into_response()
            }
            CatalogError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": format!("{what} not found")})),
            )
                .into_response(),
            CatalogError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response()
            }
            CatalogError::OAuth(e) => {
                let status = oauth_status(&e);
                (status, Json(json!({"error": e.to_string()}))).into_response()
            }
            CatalogError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response(),
        }
    }
}

/// Login failures fail closed: anything that breaks the chain of trust
/// is a 401, provider-side token errors surface as 500.
fn oauth_status(error: &OAuthError) -> StatusCode {
    match error {
        OAuthError::StateMismatch
        | OAuthError::ExchangeFailed(_)
        | OAuthError::AudienceMismatch
        | OAuthError::IdentityMismatch => StatusCode::UNAUTHORIZED,
        OAuthError::Provider(_) | OAuthError::Http(_) | OAuthError::Malformed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Type alias for catalog results
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_mismatch_is_unauthorized() {
        assert_eq!(
            oauth_status(&OAuthError::StateMismatch),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            oauth_status(&OAuthError::AudienceMismatch),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn provider_errors_are_internal() {
        assert_eq!(
            oauth_status(&OAuthError::Provider("invalid_token".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
