//! Signed-cookie session storage.
//!
//! Two cookies are used, both signed with the key derived from the session
//! secret:
//! - `session`: the [`SessionData`] of the client
//! - `auth_state`: the [`PendingAuthorization`] between login and callback

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use gatehouse_identity::{PendingAuthorization, SessionData, SessionError};
use rootcause::prelude::Report;
use std::convert::Infallible;
use time::Duration as TimeDuration;

use crate::config::SessionConfig;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Auth state cookie name (for CSRF protection during OIDC flow).
pub const AUTH_STATE_COOKIE: &str = "auth_state";

/// Lifetime of the auth state cookie.
const AUTH_STATE_MAX_AGE_MINUTES: i64 = 10;

/// Extractor for the current session.
///
/// A missing, tampered or undecodable cookie yields an anonymous session.
pub struct CurrentSession(pub SessionData);

impl<S> FromRequestParts<S> for CurrentSession
where
    Key: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state).await?;
        Ok(CurrentSession(load(&jar)))
    }
}

/// Reads the session from the jar.
pub fn load(jar: &SignedCookieJar) -> SessionData {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return SessionData::new();
    };

    SessionData::decode(cookie.value()).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Discarding undecodable session cookie");
        SessionData::new()
    })
}

/// Writes the session into the jar.
pub fn store(
    jar: SignedCookieJar,
    session: &SessionData,
    config: &SessionConfig,
) -> Result<SignedCookieJar, Report<SessionError>> {
    let value = session.encode()?;

    let mut cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax);
    if let Some(minutes) = config.duration_minutes {
        cookie = cookie.max_age(max_age(minutes)?);
    }

    Ok(jar.add(cookie))
}

/// Converts a session lifetime to a cookie max-age without overflowing.
fn max_age(minutes: i64) -> Result<TimeDuration, Report<SessionError>> {
    minutes
        .checked_mul(60)
        .filter(|seconds| *seconds > 0)
        .map(TimeDuration::seconds)
        .ok_or_else(|| {
            SessionError::Encode {
                details: format!("invalid session lifetime: {minutes} minutes"),
            }
            .into()
        })
}

/// Removes every session field, including any pending authorization.
pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
        .remove(Cookie::build((AUTH_STATE_COOKIE, "")).path("/"))
}

/// Stores the pending authorization for the callback.
pub fn store_pending(
    jar: SignedCookieJar,
    pending: &PendingAuthorization,
    config: &SessionConfig,
) -> Result<SignedCookieJar, Report<SessionError>> {
    let value = pending.encode()?;

    let cookie = Cookie::build((AUTH_STATE_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(AUTH_STATE_MAX_AGE_MINUTES));

    Ok(jar.add(cookie))
}

/// Reads the pending authorization, if the cookie is present.
pub fn pending(
    jar: &SignedCookieJar,
) -> Option<Result<PendingAuthorization, Report<SessionError>>> {
    jar.get(AUTH_STATE_COOKIE)
        .map(|cookie| PendingAuthorization::decode(cookie.value()))
}

/// Removes the pending authorization cookie.
pub fn remove_pending(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((AUTH_STATE_COOKIE, "")).path("/"))
}
