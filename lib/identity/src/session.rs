//! Session payload stored in the signed session cookie.
//!
//! The session holds at most one thing: the token bag of the logged-in user.
//! Its presence is the only authentication signal the application uses.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::SessionError;
use crate::token::TokenBag;

/// Per-client session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Token bag of the authenticated user, absent when anonymous.
    #[serde(default)]
    user: Option<TokenBag>,
}

impl SessionData {
    /// Creates an empty (anonymous) session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for a user who completed the code exchange.
    #[must_use]
    pub fn authenticated(user: TokenBag) -> Self {
        Self { user: Some(user) }
    }

    /// Returns the stored token bag, if any.
    #[must_use]
    pub fn user(&self) -> Option<&TokenBag> {
        self.user.as_ref()
    }

    /// Consumes the session, returning the stored token bag.
    #[must_use]
    pub fn into_user(self) -> Option<TokenBag> {
        self.user
    }

    /// Returns true if a token bag is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Removes every field from the session.
    pub fn clear(&mut self) {
        self.user = None;
    }

    /// Encodes the session as a cookie-safe string (base64url of JSON).
    pub fn encode(&self) -> Result<String, Report<SessionError>> {
        let json = serde_json::to_vec(self).map_err(|e| SessionError::Encode {
            details: e.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decodes a value produced by [`SessionData::encode`].
    pub fn decode(value: &str) -> Result<Self, Report<SessionError>> {
        let json = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|e| SessionError::Decode {
                details: e.to_string(),
            })?;
        let session = serde_json::from_slice(&json).map_err(|e| SessionError::Decode {
            details: e.to_string(),
        })?;
        Ok(session)
    }

    /// Renders the `user` field as indented JSON for display.
    ///
    /// An anonymous session renders as `null`.
    pub fn pretty_user(&self) -> Result<String, Report<SessionError>> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.user
            .serialize(&mut serializer)
            .map_err(|e| SessionError::Encode {
                details: e.to_string(),
            })?;
        let pretty = String::from_utf8(buf).map_err(|e| SessionError::Encode {
            details: e.to_string(),
        })?;
        Ok(pretty)
    }
}
