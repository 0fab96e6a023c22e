//! OIDC (OpenID Connect) provider configuration.
//!
//! The provider is identified by its domain alone; discovery, issuer and
//! logout URLs are all derived from it.

use serde::Deserialize;
use std::fmt;
use url::form_urlencoded;

/// Scopes requested during login.
pub const SCOPES: [&str; 3] = ["openid", "profile", "email"];

/// Configuration for the OIDC identity provider.
#[derive(Clone, Deserialize)]
pub struct OidcConfig {
    /// The provider's domain (e.g., "example.us.auth0.com").
    domain: String,
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
}

impl OidcConfig {
    /// Creates a new OIDC configuration.
    #[must_use]
    pub fn new(domain: String, client_id: String, client_secret: String) -> Self {
        Self {
            domain,
            client_id,
            client_secret,
        }
    }

    /// Returns the provider host, without scheme or trailing slash.
    #[must_use]
    pub fn domain(&self) -> &str {
        let domain = self.domain.trim();
        let domain = domain
            .strip_prefix("https://")
            .or_else(|| domain.strip_prefix("http://"))
            .unwrap_or(domain);
        domain.trim_end_matches('/')
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the scopes to request.
    #[must_use]
    pub fn scopes(&self) -> &'static [&'static str] {
        &SCOPES
    }

    /// Returns the issuer URL used for discovery.
    #[must_use]
    pub fn issuer_url(&self) -> String {
        format!("https://{}/", self.domain())
    }

    /// Returns the discovery document URL.
    #[must_use]
    pub fn metadata_url(&self) -> String {
        format!("{}.well-known/openid-configuration", self.issuer_url())
    }

    /// Builds the provider logout URL that sends the browser back to
    /// `return_to` afterwards.
    ///
    /// Query parameters are form-encoded, so spaces become `+`.
    #[must_use]
    pub fn logout_url(&self, return_to: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("returnTo", return_to)
            .append_pair("client_id", &self.client_id)
            .finish();
        format!("https://{}/v2/logout?{query}", self.domain())
    }
}

impl fmt::Debug for OidcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidcConfig")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}
