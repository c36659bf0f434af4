//! `Authorization` header parsing.

use axum::http::{header, HeaderMap};

use crate::error::AuthError;

/// A `"<scheme> <token>"` credential borrowed from the request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credential<'a> {
    pub scheme: &'a str,
    pub token: &'a str,
}

impl<'a> Credential<'a> {
    /// Read and parse the `Authorization` header.
    ///
    /// A header that is not visible ASCII counts as malformed, not missing.
    pub fn from_headers(headers: &'a HeaderMap) -> Result<Self, AuthError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingCredential)?;
        let value = value.to_str().map_err(|_| AuthError::MalformedCredential)?;
        Self::parse(value)
    }

    /// Split on the single space separating scheme and token. Both parts
    /// must be non-empty and the token may not contain another space.
    pub fn parse(value: &'a str) -> Result<Self, AuthError> {
        let (scheme, token) = value
            .split_once(' ')
            .ok_or(AuthError::MalformedCredential)?;

        if scheme.is_empty() || token.is_empty() || token.contains(' ') {
            return Err(AuthError::MalformedCredential);
        }

        Ok(Self { scheme, token })
    }

    /// ASCII case-insensitive scheme comparison.
    pub fn has_scheme(&self, scheme: &str) -> bool {
        self.scheme.eq_ignore_ascii_case(scheme)
    }
}
