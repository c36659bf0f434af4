use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::claims::{Claims, Uid};
use crate::credential::Credential;
use crate::error::{AuthError, ConfigurationError};
use crate::secret::{resolve_secret, SecretSource};

/// Claim read when none is configured.
pub const DEFAULT_CLAIM_KEY: &str = "uid";

fn default_claim_key() -> String {
    DEFAULT_CLAIM_KEY.to_string()
}

/// Verify-and-decode capability for bearer tokens.
pub trait TokenVerifier: Send + Sync + 'static {
    /// Check `token` against `secret` and return its claims.
    ///
    /// Failures must be reported as [`AuthError::Verification`] with a short
    /// reason suitable for the client.
    fn verify(&self, secret: &str, token: &str) -> Result<Claims, AuthError>;
}

/// Names the gate resolves at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Name of the signing secret in the [`SecretSource`].
    pub secret_key_name: String,
    /// Claim copied into [`Uid`].
    #[serde(default = "default_claim_key")]
    pub claim_key_name: String,
    /// When set, credentials with any other scheme are malformed. Unset
    /// accepts any scheme.
    #[serde(default)]
    pub required_scheme: Option<String>,
}

impl GateConfig {
    /// Config reading secret `secret_key_name`, claim `uid`, any scheme.
    pub fn new(secret_key_name: impl Into<String>) -> Self {
        Self {
            secret_key_name: secret_key_name.into(),
            claim_key_name: default_claim_key(),
            required_scheme: None,
        }
    }

    /// Copy claim `name` into [`Uid`] instead of `uid`.
    pub fn claim_key(mut self, name: impl Into<String>) -> Self {
        self.claim_key_name = name.into();
        self
    }

    /// Reject credentials whose scheme is not `scheme`, ignoring ASCII case.
    pub fn require_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.required_scheme = Some(scheme.into());
        self
    }

    /// Layered loader for this config, e.g. from `AUTHGATE_*` variables.
    ///
    /// ```ignore
    /// let config: GateConfig = GateConfig::builder()
    ///     .with_dotenv()
    ///     .with_env_prefix("AUTHGATE")
    ///     .build()?;
    /// ```
    pub fn builder() -> authgate_core::ConfigBuilder {
        authgate_core::ConfigBuilder::new()
    }
}

/// The authentication pipeline: secret, header, token, claim.
pub struct AuthGate<V> {
    config: GateConfig,
    secrets: Arc<dyn SecretSource>,
    verifier: V,
}

impl<V: TokenVerifier> AuthGate<V> {
    /// Gate reading secrets from `secrets`, which is shared behind an `Arc`
    /// by every clone of the layer.
    pub fn new(config: GateConfig, secrets: impl SecretSource, verifier: V) -> Self {
        Self {
            config,
            secrets: Arc::new(secrets),
            verifier,
        }
    }

    /// Names this gate resolves.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Resolve the secret without handling a request, for fail-fast checks
    /// at startup.
    pub fn check_configuration(&self) -> Result<(), ConfigurationError> {
        resolve_secret(&*self.secrets, &self.config.secret_key_name).map(|_| ())
    }

    /// Run the pipeline over a request's headers.
    ///
    /// The secret is resolved before any header is read, so a missing secret
    /// fails every request the same way.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uid, AuthError> {
        let secret = resolve_secret(&*self.secrets, &self.config.secret_key_name)?;

        let credential = Credential::from_headers(headers)?;
        if let Some(required) = &self.config.required_scheme {
            if !credential.has_scheme(required) {
                return Err(AuthError::MalformedCredential);
            }
        }

        let claims = self.verifier.verify(secret, credential.token)?;
        Ok(claims.subject(&self.config.claim_key_name))
    }
}

#[cfg(feature = "jwt")]
impl AuthGate<crate::jwt::Hs256Verifier> {
    pub fn hs256(config: GateConfig, secrets: impl SecretSource) -> Self {
        Self::new(config, secrets, crate::jwt::Hs256Verifier::new())
    }
}

impl<V> std::fmt::Debug for AuthGate<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
