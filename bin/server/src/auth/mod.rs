//! Authentication module for the gatehouse server.
//!
//! This module provides:
//! - OIDC authentication with an external identity provider
//! - Signed-cookie session storage
//! - The auth gate middleware and extractors for Axum routes
//!
//! # Session Model
//!
//! The session cookie carries the token bag returned by the provider and
//! nothing else. Its presence is the only authorization check: there are no
//! roles, and the token is not re-validated after the code exchange.

pub mod middleware;
pub mod oidc;
pub mod routes;
pub mod session;

pub use middleware::{AuthRejection, RequireUser, require_auth};
pub use oidc::OidcClient;
pub use routes::{ExternalUrl, callback, callback_form, login, logout};
pub use session::CurrentSession;

/// Path of the login route, target of the auth gate's redirect.
pub const LOGIN_PATH: &str = "/login";

/// Path of the OIDC callback route.
pub const CALLBACK_PATH: &str = "/callback";

/// Path of the public home route.
pub const HOME_PATH: &str = "/";
