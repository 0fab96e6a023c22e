//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. Nested keys use
//! `__` as separator (`OIDC__CLIENT_ID`, `SESSION__SECRET_KEY`).
//!
//! See [`OidcConfig`](gatehouse_identity::OidcConfig) for identity provider
//! configuration.

use axum_extra::extract::cookie::Key;
use gatehouse_identity::OidcConfig;
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Minimum length of the session secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_MINUTES: i64 = 365 * 24 * 60;

/// Flat variable names accepted as fallbacks for nested keys.
const LEGACY_VARS: [(&str, &str); 4] = [
    ("AUTH0_DOMAIN", "oidc.domain"),
    ("AUTH0_CLIENT_ID", "oidc.client_id"),
    ("AUTH0_CLIENT_SECRET", "oidc.client_secret"),
    ("APP_SECRET_KEY", "session.secret_key"),
];

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_bind_host")]
    pub bind_host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Absolute base URL used when building external links. Derived from the
    /// request when unset.
    #[serde(default)]
    pub public_url: Option<String>,

    /// Session configuration.
    pub session: SessionConfig,

    /// OIDC authentication configuration.
    pub oidc: OidcConfig,
}

/// Session-related configuration.
#[derive(Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret from which the cookie signing key is derived.
    pub secret_key: String,

    /// Session lifetime in minutes. Unset means the cookie lasts until the
    /// browser is closed.
    #[serde(default)]
    pub duration_minutes: Option<i64>,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_bind_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

impl SessionConfig {
    /// Derives the cookie signing key from the configured secret.
    ///
    /// # Panics
    ///
    /// Panics if the secret is shorter than [`MIN_SECRET_LEN`] bytes. Configs
    /// that pass [`SessionConfig::validate`] never do.
    #[must_use]
    pub fn signing_key(&self) -> Key {
        Key::derive_from(self.secret_key.as_bytes())
    }

    /// Checks the secret length and the session lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is too short to derive a key, or if the
    /// lifetime is not between one minute and [`MAX_SESSION_MINUTES`].
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.secret_key.len() < MIN_SECRET_LEN {
            return Err(config::ConfigError::Message(format!(
                "session secret key must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if let Some(minutes) = self
            .duration_minutes
            .filter(|minutes| !(1..=MAX_SESSION_MINUTES).contains(minutes))
        {
            return Err(config::ConfigError::Message(format!(
                "session duration must be between 1 and {MAX_SESSION_MINUTES} minutes, got {minutes}"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret_key", &"[redacted]")
            .field("duration_minutes", &self.duration_minutes)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Loads configuration from the given variables, as if they were the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_vars<I>(vars: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: config::Map<String, String> = vars.into_iter().collect();

        let mut builder = config::Config::builder();
        for (legacy, key) in LEGACY_VARS {
            if let Some(value) = vars.get(legacy) {
                builder = builder.set_default(key, value.as_str())?;
            }
        }

        let config: Self = builder
            .add_source(
                // Values stay strings; serde converts the numeric and boolean
                // fields, so ids and secrets keep their exact text
                config::Environment::default()
                    .separator("__")
                    .source(Some(vars)),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants the type system does not capture.
    ///
    /// # Errors
    ///
    /// Returns an error if the session settings are invalid.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.session.validate()
    }

    /// Returns the socket address to bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port)
    }
}
