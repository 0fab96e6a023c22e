//! OIDC client implementation using the openidconnect crate.

use async_trait::async_trait;
use chrono::Utc;
use gatehouse_identity::{
    AuthorizationRedirect, IdentityProvider, OidcConfig, PendingAuthorization, ProviderError,
    TokenBag,
};
use openidconnect::core::{CoreAuthenticationFlow, CoreClient, CoreProviderMetadata};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use rootcause::prelude::Report;
use tracing::instrument;

/// OIDC client for authenticating users.
pub struct OidcClient {
    provider_metadata: CoreProviderMetadata,
    client_id: ClientId,
    client_secret: ClientSecret,
    http_client: reqwest::Client,
    config: OidcConfig,
}

impl OidcClient {
    /// Creates a new OIDC client by discovering the provider metadata.
    #[instrument(skip_all, fields(domain = %config.domain()))]
    pub async fn discover(config: OidcConfig) -> Result<Self, Report<ProviderError>> {
        let issuer_url =
            IssuerUrl::new(config.issuer_url()).map_err(|e| ProviderError::Configuration {
                details: format!("invalid issuer URL: {e}"),
            })?;

        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ProviderError::Configuration {
                details: format!("failed to create HTTP client: {e}"),
            })?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer_url, &http_client)
            .await
            .map_err(|e| ProviderError::Discovery {
                details: format!("failed to discover provider: {e}"),
            })?;

        tracing::debug!(metadata_url = %config.metadata_url(), "Discovered OIDC provider");

        Ok(Self {
            provider_metadata,
            client_id: ClientId::new(config.client_id().to_string()),
            client_secret: ClientSecret::new(config.client_secret().to_string()),
            http_client,
            config,
        })
    }
}

#[async_trait]
impl IdentityProvider for OidcClient {
    fn authorize(
        &self,
        redirect_uri: &str,
    ) -> Result<AuthorizationRedirect, Report<ProviderError>> {
        let redirect_url =
            RedirectUrl::new(redirect_uri.to_string()).map_err(|e| {
                ProviderError::Configuration {
                    details: format!("invalid redirect URI: {e}"),
                }
            })?;

        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(redirect_url);

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .set_pkce_challenge(pkce_challenge);

        // `openid` is always sent by the authorization request itself
        for scope in self.config.scopes().iter().filter(|scope| **scope != "openid") {
            auth_request = auth_request.add_scope(Scope::new((*scope).to_string()));
        }

        let (auth_url, csrf_token, nonce) = auth_request.url();

        Ok(AuthorizationRedirect {
            url: auth_url.to_string(),
            pending: PendingAuthorization {
                csrf_token: csrf_token.secret().clone(),
                pkce_verifier: pkce_verifier.secret().clone(),
                nonce: nonce.secret().clone(),
                redirect_uri: redirect_uri.to_string(),
            },
        })
    }

    #[instrument(skip_all)]
    async fn exchange_code(
        &self,
        code: &str,
        pending: &PendingAuthorization,
    ) -> Result<TokenBag, Report<ProviderError>> {
        let redirect_url =
            RedirectUrl::new(pending.redirect_uri.clone()).map_err(|e| {
                ProviderError::Configuration {
                    details: format!("invalid redirect URI: {e}"),
                }
            })?;

        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(redirect_url);

        let token_request = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| ProviderError::TokenExchange {
                details: format!("token endpoint error: {e}"),
            })?;

        let token_response = token_request
            .set_pkce_verifier(PkceCodeVerifier::new(pending.pkce_verifier.clone()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| ProviderError::TokenExchange {
                details: format!("token exchange failed: {e}"),
            })?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| ProviderError::TokenExchange {
                details: "no ID token in response".to_string(),
            })?;

        // Verify the ID token and keep its claims as userinfo
        let nonce = Nonce::new(pending.nonce.clone());
        let claims = id_token
            .claims(&client.id_token_verifier(), &nonce)
            .map_err(|e| ProviderError::TokenValidation {
                details: format!("ID token validation failed: {e}"),
            })?;

        let userinfo = serde_json::to_value(claims).map_err(|e| ProviderError::TokenValidation {
            details: format!("failed to serialize ID token claims: {e}"),
        })?;

        let response =
            serde_json::to_value(&token_response).map_err(|e| ProviderError::TokenExchange {
                details: format!("failed to serialize token response: {e}"),
            })?;

        TokenBag::from_token_response(response, userinfo, Utc::now())
    }
}
