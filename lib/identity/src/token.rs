//! The token bag returned by the identity provider.
//!
//! A token bag is stored in the session as-is after a successful code
//! exchange. Apart from claim lookups for logging and display it is treated as
//! opaque, so unknown fields from the provider are kept verbatim.

use chrono::{DateTime, Utc};
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// Placeholder used when a claim is absent from `userinfo`.
pub const UNKNOWN: &str = "unknown";

/// Tokens and decoded user claims from an authorization-code exchange.
///
/// Every field is optional so that bags produced by other providers (or by
/// older builds) still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenBag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Lifetime of the access token in seconds, as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// UNIX timestamp at which the access token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Verified ID token claims.
    #[serde(default)]
    pub userinfo: Map<String, Value>,
    /// Any other fields of the token response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenBag {
    /// Builds a token bag from a serialized token response and the verified
    /// ID token claims.
    ///
    /// `expires_at` is derived from `expires_in` relative to `now`.
    pub fn from_token_response(
        response: Value,
        userinfo: Value,
        now: DateTime<Utc>,
    ) -> Result<Self, Report<ProviderError>> {
        let mut bag: TokenBag =
            serde_json::from_value(response).map_err(|e| ProviderError::TokenExchange {
                details: format!("unexpected token response: {e}"),
            })?;

        bag.userinfo = match userinfo {
            Value::Object(claims) => claims,
            other => {
                return Err(ProviderError::TokenValidation {
                    details: format!("ID token claims are not an object: {other}"),
                }
                .into());
            }
        };

        if bag.expires_at.is_none() {
            bag.expires_at = bag
                .expires_in
                .and_then(|secs| i64::try_from(secs).ok())
                .map(|secs| now.timestamp() + secs);
        }

        Ok(bag)
    }

    /// Returns a string claim from `userinfo`.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.userinfo.get(name).and_then(Value::as_str)
    }

    /// Returns the `sub` claim, or [`UNKNOWN`].
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.claim("sub").unwrap_or(UNKNOWN)
    }

    /// Returns the `email` claim, or [`UNKNOWN`].
    #[must_use]
    pub fn email(&self) -> &str {
        self.claim("email").unwrap_or(UNKNOWN)
    }

    /// Returns a human-friendly name from `name`, `nickname` or
    /// `preferred_username`, in that order.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.claim("name")
            .or_else(|| self.claim("nickname"))
            .or_else(|| self.claim("preferred_username"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn claims_are_read_from_userinfo() {
        let bag: TokenBag = serde_json::from_value(json!({
            "userinfo": {"sub": "abc123", "email": "a@b.com", "nickname": "ab"}
        }))
        .expect("deserialize");

        assert_eq!(bag.user_id(), "abc123");
        assert_eq!(bag.email(), "a@b.com");
        assert_eq!(bag.display_name(), Some("ab"));
    }

    #[test]
    fn missing_claims_default_to_unknown() {
        let bag: TokenBag = serde_json::from_value(json!({"userinfo": {}})).expect("deserialize");

        assert_eq!(bag.user_id(), UNKNOWN);
        assert_eq!(bag.email(), UNKNOWN);
        assert_eq!(bag.display_name(), None);
    }

    #[test]
    fn missing_userinfo_defaults_to_empty() {
        let bag: TokenBag = serde_json::from_value(json!({"access_token": "at"})).expect("deserialize");

        assert!(bag.userinfo.is_empty());
        assert_eq!(bag.user_id(), UNKNOWN);
    }

    #[test]
    fn non_string_claims_are_treated_as_absent() {
        let bag: TokenBag =
            serde_json::from_value(json!({"userinfo": {"sub": 42}})).expect("deserialize");

        assert_eq!(bag.user_id(), UNKNOWN);
    }

    #[test]
    fn from_token_response_sets_userinfo_and_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let response = json!({
            "access_token": "at",
            "token_type": "bearer",
            "id_token": "header.payload.sig",
            "expires_in": 86400,
            "scope": "openid profile email",
        });
        let claims = json!({"sub": "auth0|1", "email": "x@example.com"});

        let bag = TokenBag::from_token_response(response, claims, now).expect("token bag");

        assert_eq!(bag.access_token.as_deref(), Some("at"));
        assert_eq!(bag.id_token.as_deref(), Some("header.payload.sig"));
        assert_eq!(bag.scope.as_deref(), Some("openid profile email"));
        assert_eq!(bag.expires_at, Some(now.timestamp() + 86400));
        assert_eq!(bag.user_id(), "auth0|1");
        assert_eq!(bag.email(), "x@example.com");
    }

    #[test]
    fn from_token_response_rejects_non_object_claims() {
        let result = TokenBag::from_token_response(json!({}), json!("nope"), Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_preserved() {
        let bag: TokenBag = serde_json::from_value(json!({
            "userinfo": {},
            "session_state": "xyz"
        }))
        .expect("deserialize");

        assert_eq!(bag.extra.get("session_state"), Some(&json!("xyz")));

        let value = serde_json::to_value(&bag).expect("serialize");
        assert_eq!(value["session_state"], json!("xyz"));
    }
}
