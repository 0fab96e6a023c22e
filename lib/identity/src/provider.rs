//! The identity provider seam.
//!
//! Route handlers talk to the provider only through [`IdentityProvider`], so
//! the OIDC client can be swapped for a fake in tests.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, SessionError};
use crate::token::TokenBag;

/// Data needed to complete the OIDC callback.
///
/// Created at login time and carried to the callback in a signed,
/// short-lived cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    pub csrf_token: String,
    pub pkce_verifier: String,
    pub nonce: String,
    /// Redirect URI sent with the authorization request; the token request
    /// must repeat it.
    pub redirect_uri: String,
}

impl PendingAuthorization {
    /// Returns true if `state` echoes this authorization's CSRF token.
    #[must_use]
    pub fn matches_state(&self, state: &str) -> bool {
        !self.csrf_token.is_empty() && self.csrf_token == state
    }

    /// Encodes the pending authorization as a cookie-safe string.
    pub fn encode(&self) -> Result<String, Report<SessionError>> {
        let json = serde_json::to_vec(self).map_err(|e| SessionError::Encode {
            details: e.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decodes a value produced by [`PendingAuthorization::encode`].
    pub fn decode(value: &str) -> Result<Self, Report<SessionError>> {
        let json = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|e| SessionError::Decode {
                details: e.to_string(),
            })?;
        let pending = serde_json::from_slice(&json).map_err(|e| SessionError::Decode {
            details: e.to_string(),
        })?;
        Ok(pending)
    }
}

/// Where to send the browser to start a login, and what to remember until it
/// comes back.
#[derive(Debug, Clone)]
pub struct AuthorizationRedirect {
    pub url: String,
    pub pending: PendingAuthorization,
}

/// An OIDC identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Builds the authorization endpoint URL for a login whose callback is
    /// `redirect_uri`.
    fn authorize(&self, redirect_uri: &str) -> Result<AuthorizationRedirect, Report<ProviderError>>;

    /// Exchanges an authorization code for tokens and verified claims.
    async fn exchange_code(
        &self,
        code: &str,
        pending: &PendingAuthorization,
    ) -> Result<TokenBag, Report<ProviderError>>;
}
