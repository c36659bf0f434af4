use authgate_core::HttpError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::borrow::Cow;

/// Client-facing message for a configuration fault. The key name stays in
/// the logs.
const NOT_CONFIGURED: &str = "Authentication is not configured.";

/// The signing secret could not be resolved.
///
/// This is an operator fault, never a client one, and is kept apart from the
/// 401 family so it cannot be mistaken for a rejected credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("secret `{key}` is not configured or is empty")]
pub struct ConfigurationError {
    key: String,
}

impl ConfigurationError {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Name of the secret that failed to resolve.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Every way the gate can refuse a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("No authorization header provided.")]
    MissingCredential,
    #[error("Invalid authorization header format.")]
    MalformedCredential,
    #[error("Validation failed due: {0}")]
    Verification(String),
}

impl AuthError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl HttpError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingCredential | Self::MalformedCredential | Self::Verification(_) => {
                StatusCode::UNAUTHORIZED
            }
        }
    }

    fn message(&self) -> Cow<'_, str> {
        match self {
            Self::Configuration(_) => Cow::Borrowed(NOT_CONFIGURED),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
