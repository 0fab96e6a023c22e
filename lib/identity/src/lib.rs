//! Identity and session types for gatehouse.
//!
//! This crate provides:
//! - The token bag returned by the identity provider (`TokenBag`)
//! - The signed-cookie session payload (`SessionData`)
//! - OIDC provider configuration (`OidcConfig`)
//! - The identity provider seam (`IdentityProvider`, `PendingAuthorization`)
//! - Audit log records (`AuditEvent`)
//!
//! None of these types depend on the HTTP framework; the server binary wires
//! them into routes and cookies.
//!
//! # Example
//!
//! ```
//! use gatehouse_identity::{SessionData, TokenBag};
//!
//! let bag: TokenBag = serde_json::from_str(
//!     r#"{"userinfo": {"sub": "auth0|123456", "email": "alice@example.com"}}"#,
//! )
//! .expect("token bag");
//!
//! let session = SessionData::authenticated(bag);
//! assert!(session.is_authenticated());
//!
//! let cookie_value = session.encode().expect("encode");
//! let restored = SessionData::decode(&cookie_value).expect("decode");
//! assert_eq!(restored.user().map(|u| u.user_id()), Some("auth0|123456"));
//! ```

pub mod audit;
pub mod error;
pub mod oidc;
pub mod provider;
pub mod session;
pub mod token;

// Re-export main types at crate root
pub use audit::{AuditEvent, format_timestamp};
pub use error::{ProviderError, SessionError};
pub use oidc::OidcConfig;
pub use provider::{AuthorizationRedirect, IdentityProvider, PendingAuthorization};
pub use session::SessionData;
pub use token::{TokenBag, UNKNOWN};
