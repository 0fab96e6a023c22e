//! Error types for the identity crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ProviderError`: failures talking to the identity provider
//! - `SessionError`: failures encoding or decoding cookie payloads

use std::fmt;

/// Errors from identity provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Configuration error (invalid URLs, etc.)
    Configuration { details: String },
    /// Failed to discover provider metadata.
    Discovery { details: String },
    /// Token exchange failed.
    TokenExchange { details: String },
    /// ID token validation failed.
    TokenValidation { details: String },
    /// The provider redirected back with an error instead of a code.
    Denied {
        error: String,
        description: Option<String>,
    },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { details } => {
                write!(f, "OIDC configuration error: {details}")
            }
            Self::Discovery { details } => {
                write!(f, "OIDC discovery error: {details}")
            }
            Self::TokenExchange { details } => {
                write!(f, "OIDC token exchange error: {details}")
            }
            Self::TokenValidation { details } => {
                write!(f, "OIDC token validation error: {details}")
            }
            Self::Denied {
                error,
                description: Some(description),
            } => {
                write!(f, "identity provider returned '{error}': {description}")
            }
            Self::Denied {
                error,
                description: None,
            } => {
                write!(f, "identity provider returned '{error}'")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Errors from session payload encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Payload could not be serialized.
    Encode { details: String },
    /// Payload could not be decoded (bad base64 or JSON).
    Decode { details: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode { details } => write!(f, "failed to encode session: {details}"),
            Self::Decode { details } => write!(f, "failed to decode session: {details}"),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_token_exchange_display() {
        let err = ProviderError::TokenExchange {
            details: "invalid_grant".to_string(),
        };
        assert!(err.to_string().contains("token exchange"));
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[test]
    fn provider_error_denied_display() {
        let err = ProviderError::Denied {
            error: "access_denied".to_string(),
            description: Some("user cancelled".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "identity provider returned 'access_denied': user cancelled"
        );

        let err = ProviderError::Denied {
            error: "login_required".to_string(),
            description: None,
        };
        assert_eq!(err.to_string(), "identity provider returned 'login_required'");
    }

    #[test]
    fn session_error_display() {
        let err = SessionError::Decode {
            details: "bad base64".to_string(),
        };
        assert!(err.to_string().contains("decode session"));
        assert!(err.to_string().contains("bad base64"));
    }
}
