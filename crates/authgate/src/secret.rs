//! Signing-secret resolution.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigurationError;

/// Key-value lookup for named secrets.
///
/// Implementations must be cheap in-memory reads: the gate resolves the
/// secret on every request, before looking at any header.
pub trait SecretSource: Send + Sync + 'static {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl SecretSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: SecretSource + ?Sized> SecretSource for Arc<T> {
    fn lookup(&self, name: &str) -> Option<&str> {
        (**self).lookup(name)
    }
}

/// Immutable snapshot of named secrets, taken once at startup.
#[derive(Clone, Default)]
pub struct SecretStore {
    entries: HashMap<String, String>,
}

impl SecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the process environment.
    ///
    /// Load `.env` files first (e.g. via `ConfigBuilder::with_dotenv`);
    /// variables set after this call are not seen. Non-unicode variables are
    /// skipped.
    pub fn from_env() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Add or replace the secret `name`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }
}

// Values are secrets; only names are printed.
impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SecretStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SecretSource for SecretStore {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }
}

/// Resolve `name`, treating an empty value the same as an absent one.
pub fn resolve_secret<'a, S>(source: &'a S, name: &str) -> Result<&'a str, ConfigurationError>
where
    S: SecretSource + ?Sized,
{
    source
        .lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigurationError::new(name))
}
