//! The auth gate: middleware and extractors for Axum.

use axum::{
    extract::{ConnectInfo, FromRef, FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::Key;
use chrono::Utc;
use gatehouse_identity::{AuditEvent, TokenBag, UNKNOWN};
use std::net::SocketAddr;

use super::{LOGIN_PATH, session::CurrentSession};

/// Middleware guarding a route behind a logged-in session.
///
/// Anonymous requests are logged as `UNAUTHORIZED_ACCESS` and redirected to
/// the login route without reaching the wrapped handler. Authenticated
/// requests pass through untouched.
pub async fn require_auth(
    CurrentSession(session): CurrentSession,
    request: Request,
    next: Next,
) -> Response {
    if session.is_authenticated() {
        return next.run(request).await;
    }

    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    AuditEvent::UnauthorizedAccess {
        ip: &ip,
        path: request.uri().path(),
        timestamp: Utc::now(),
    }
    .emit();

    AuthRejection::NotAuthenticated.into_response()
}

/// Extractor for the token bag of the logged-in user.
///
/// If the user is not authenticated, they will be redirected to the login page.
pub struct RequireUser(pub TokenBag);

impl<S> FromRequestParts<S> for RequireUser
where
    Key: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(CurrentSession(session)) = CurrentSession::from_request_parts(parts, state).await;

        session
            .into_user()
            .map(RequireUser)
            .ok_or(AuthRejection::NotAuthenticated)
    }
}

/// Rejection type for authentication extractors.
#[derive(Debug)]
pub enum AuthRejection {
    NotAuthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated => Redirect::to(LOGIN_PATH).into_response(),
        }
    }
}
