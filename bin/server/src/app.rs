//! Application state and router.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::get,
};
use axum_extra::extract::cookie::Key;
use gatehouse_identity::{IdentityProvider, OidcConfig};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::{ServerConfig, SessionConfig};
use crate::pages;

/// Shared application state, constructed once at startup and handed to every
/// handler.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider used for login and code exchange.
    pub provider: Arc<dyn IdentityProvider>,
    /// OIDC provider configuration.
    pub oidc_config: Arc<OidcConfig>,
    /// Session cookie configuration.
    pub session_config: Arc<SessionConfig>,
    /// Absolute base URL for external links, if configured.
    pub public_url: Option<Arc<str>>,
    key: Key,
}

impl AppState {
    /// Creates a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session configuration is invalid, e.g. the
    /// secret is too short to derive the cookie signing key.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        oidc_config: OidcConfig,
        session_config: SessionConfig,
        public_url: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        session_config.validate()?;
        let key = session_config.signing_key();
        Ok(Self {
            provider,
            oidc_config: Arc::new(oidc_config),
            session_config: Arc::new(session_config),
            public_url: public_url.map(|url| Arc::from(url.trim_end_matches('/'))),
            key,
        })
    }

    /// Creates the application state from a loaded server configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the session configuration is invalid.
    pub fn from_config(
        config: ServerConfig,
        provider: Arc<dyn IdentityProvider>,
    ) -> Result<Self, config::ConfigError> {
        Self::new(provider, config.oidc, config.session, config.public_url)
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

/// Builds the application router.
///
/// `/protected` is wrapped by the auth gate; every other route is public.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(auth::login))
        .route(
            "/callback",
            get(auth::callback).post(auth::callback_form),
        )
        .route("/logout", get(auth::logout))
        .route(
            "/protected",
            get(pages::protected).route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_auth,
            )),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gatehouse_identity::{
        AuthorizationRedirect, PendingAuthorization, ProviderError, TokenBag,
    };
    use rootcause::prelude::Report;

    struct NoProvider;

    #[async_trait]
    impl IdentityProvider for NoProvider {
        fn authorize(
            &self,
            _redirect_uri: &str,
        ) -> Result<AuthorizationRedirect, Report<ProviderError>> {
            Err(ProviderError::Configuration {
                details: "unused".to_string(),
            }
            .into())
        }

        async fn exchange_code(
            &self,
            _code: &str,
            _pending: &PendingAuthorization,
        ) -> Result<TokenBag, Report<ProviderError>> {
            Err(ProviderError::Configuration {
                details: "unused".to_string(),
            }
            .into())
        }
    }

    fn oidc_config() -> OidcConfig {
        OidcConfig::new(
            "tenant.example.com".to_string(),
            "client-id".to_string(),
            "client-secret".to_string(),
        )
    }

    fn session_config(secret_key: &str) -> SessionConfig {
        SessionConfig {
            secret_key: secret_key.to_string(),
            duration_minutes: None,
            secure_cookies: false,
        }
    }

    #[test]
    fn short_secret_is_rejected_instead_of_panicking() {
        let result = AppState::new(
            Arc::new(NoProvider),
            oidc_config(),
            session_config("too-short"),
            None,
        );

        assert!(result.is_err());
    }

    #[test]
    fn public_url_loses_trailing_slash() {
        let state = AppState::new(
            Arc::new(NoProvider),
            oidc_config(),
            session_config("0123456789abcdef0123456789abcdef"),
            Some("https://app.example.com/".to_string()),
        )
        .expect("state");

        assert_eq!(state.public_url.as_deref(), Some("https://app.example.com"));
    }
}
