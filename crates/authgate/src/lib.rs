//! Bearer-token authentication gate for axum/tower services.
//!
//! For every request the gate resolves a named signing secret, parses the
//! `Authorization: <scheme> <token>` header, verifies the token as an HS256
//! JWT and attaches one claim to the request as [`Uid`]. Any failure ends
//! the request with a JSON error and the wrapped handler never runs:
//!
//! | failure | status | message |
//! |---------|--------|---------|
//! | secret unset or empty | 500 | `Authentication is not configured.` |
//! | no header | 401 | `No authorization header provided.` |
//! | not `<scheme> <token>` | 401 | `Invalid authorization header format.` |
//! | token rejected | 401 | `Validation failed due: <reason>` |
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{routing::get, Extension, Router};
//! use authgate::{AuthGate, AuthGateExt, GateConfig, SecretStore, Uid};
//!
//! async fn me(Extension(uid): Extension<Uid>) -> String {
//!     uid.to_string()
//! }
//!
//! let gate = AuthGate::hs256(GateConfig::new("JWT_SECRET"), SecretStore::from_env());
//! gate.check_configuration()?;
//!
//! let app = Router::new()
//!     .route("/me", get(me))
//!     .with_auth_gate(gate);
//! ```

mod claims;
mod credential;
mod error;
mod gate;
mod layer;
mod secret;

#[cfg(feature = "jwt")]
pub mod jwt;

pub use claims::{Claims, Uid};
pub use credential::Credential;
pub use error::{AuthError, ConfigurationError};
pub use gate::{AuthGate, GateConfig, TokenVerifier, DEFAULT_CLAIM_KEY};
pub use layer::{AuthGateExt, AuthGateLayer, AuthGateService};
pub use secret::{resolve_secret, SecretSource, SecretStore};

#[cfg(feature = "jwt")]
pub use jwt::Hs256Verifier;
#[cfg(feature = "jwt")]
pub use layer::protect;
