//! Authentication routes for login, callback, and logout.

use axum::{
    Form,
    extract::{FromRequestParts, Query, State},
    http::{StatusCode, header::HOST, request::Parts},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::SignedCookieJar;
use chrono::Utc;
use gatehouse_identity::{AuditEvent, AuthorizationRedirect, ProviderError, SessionData};
use serde::Deserialize;

use super::{CALLBACK_PATH, HOME_PATH, session};
use crate::app::AppState;
use crate::error::AuthError;

/// Parameters the provider sends back to the callback, either in the query
/// string or as a form post.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Absolute base URL of this application, for links handed to the provider.
///
/// Uses the configured public URL when set, otherwise the request's `Host`
/// header and `X-Forwarded-Proto` (defaulting to `http`).
///
/// Both headers are client-controlled. Without a public URL the login
/// redirect and logout `returnTo` follow whatever the client sends, so
/// deployments outside a trusted reverse proxy should set `PUBLIC_URL`.
#[derive(Debug, Clone)]
pub struct ExternalUrl(String);

impl ExternalUrl {
    /// Returns the absolute URL of `path`.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }
}

impl FromRequestParts<AppState> for ExternalUrl {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(public_url) = &state.public_url {
            return Ok(ExternalUrl(public_url.to_string()));
        }

        let host = parts
            .headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|authority| authority.to_string()))
            .ok_or((StatusCode::BAD_REQUEST, "Missing Host header"))?;

        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("http");

        Ok(ExternalUrl(format!("{scheme}://{host}")))
    }
}

/// Initiates the OIDC login flow by redirecting to the identity provider.
pub async fn login(
    State(state): State<AppState>,
    base: ExternalUrl,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AuthError> {
    let redirect_uri = base.join(CALLBACK_PATH);

    let AuthorizationRedirect { url, pending } = state
        .provider
        .authorize(&redirect_uri)
        .map_err(AuthError::Provider)?;

    // Store the auth state in a signed cookie for validation on callback
    let jar = session::store_pending(jar, &pending, &state.session_config)
        .map_err(AuthError::Session)?;

    Ok((jar, Redirect::to(&url)))
}

/// Handles the OIDC callback after the user authenticates with the identity
/// provider (query string variant).
pub async fn callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, AuthError> {
    complete_login(&state, jar, params).await
}

/// Handles the OIDC callback when the provider uses `response_mode=form_post`.
pub async fn callback_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(params): Form<CallbackParams>,
) -> Result<impl IntoResponse, AuthError> {
    complete_login(&state, jar, params).await
}

async fn complete_login(
    state: &AppState,
    jar: SignedCookieJar,
    params: CallbackParams,
) -> Result<(SignedCookieJar, Redirect), AuthError> {
    if let Some(error) = params.error {
        return Err(AuthError::Provider(
            ProviderError::Denied {
                error,
                description: params.error_description,
            }
            .into(),
        ));
    }

    // Retrieve and validate auth state from cookie
    let pending = session::pending(&jar)
        .ok_or(AuthError::MissingAuthState)?
        .map_err(AuthError::InvalidAuthState)?;

    if !params
        .state
        .as_deref()
        .is_some_and(|returned| pending.matches_state(returned))
    {
        return Err(AuthError::CsrfMismatch);
    }

    let code = params.code.ok_or(AuthError::MissingCode)?;

    // Exchange the authorization code for tokens
    let user = state
        .provider
        .exchange_code(&code, &pending)
        .await
        .map_err(AuthError::Provider)?;

    AuditEvent::Login {
        user_id: user.user_id(),
        email: user.email(),
        timestamp: Utc::now(),
    }
    .emit();

    let session_data = SessionData::authenticated(user);
    let jar = session::store(jar, &session_data, &state.session_config)
        .map_err(AuthError::Session)?;
    let jar = session::remove_pending(jar);

    Ok((jar, Redirect::to(HOME_PATH)))
}

/// Logs out the user by clearing their session and sending them through the
/// provider's logout endpoint, which returns them to the home page.
pub async fn logout(
    State(state): State<AppState>,
    base: ExternalUrl,
    jar: SignedCookieJar,
) -> impl IntoResponse {
    let logout_url = state.oidc_config.logout_url(&base.join(HOME_PATH));

    (session::clear(jar), Redirect::to(&logout_url))
}
