//! Error types for route handlers.
//!
//! Library errors arrive as rootcause reports; these enums decide the status
//! code and keep the details in the server log rather than the response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gatehouse_identity::{ProviderError, SessionError};
use rootcause::prelude::Report;
use std::fmt;

/// Authentication errors.
#[derive(Debug)]
pub enum AuthError {
    /// The callback arrived without an auth state cookie.
    MissingAuthState,
    /// The auth state cookie could not be decoded.
    InvalidAuthState(Report<SessionError>),
    /// The `state` parameter does not match the auth state cookie.
    CsrfMismatch,
    /// The callback carried neither a code nor an error.
    MissingCode,
    /// The identity provider rejected the login or the code exchange.
    Provider(Report<ProviderError>),
    /// The session could not be written.
    Session(Report<SessionError>),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAuthState => write!(f, "missing auth state"),
            Self::InvalidAuthState(report) => write!(f, "invalid auth state: {report}"),
            Self::CsrfMismatch => write!(f, "CSRF token mismatch"),
            Self::MissingCode => write!(f, "missing authorization code"),
            Self::Provider(report) => write!(f, "{report}"),
            Self::Session(report) => write!(f, "{report}"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingAuthState => (StatusCode::BAD_REQUEST, "Missing auth state"),
            Self::InvalidAuthState(report) => {
                tracing::warn!(error = %report, "Invalid auth state cookie");
                (StatusCode::BAD_REQUEST, "Invalid auth state")
            }
            Self::CsrfMismatch => (StatusCode::BAD_REQUEST, "CSRF token mismatch"),
            Self::MissingCode => (StatusCode::BAD_REQUEST, "Missing authorization code"),
            Self::Provider(report) => {
                tracing::error!(error = %report, "Login failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
            Self::Session(report) => {
                tracing::error!(error = %report, "Session error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}

/// Page rendering errors.
#[derive(Debug)]
pub enum PageError {
    /// The session could not be serialized for display.
    Session(Report<SessionError>),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::Session(report) => {
                tracing::error!(error = %report, "Failed to render session");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
