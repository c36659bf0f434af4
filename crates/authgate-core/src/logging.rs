//! Logging initialization.
//!
//! The gate logs rejections at `debug` and configuration faults at `error`,
//! all under the `authgate` target. [`DEFAULT_FILTER`] keeps those visible
//! while the rest of the service logs at `info`.

use serde::Deserialize;
use std::str::FromStr;

/// Directives used when neither `RUST_LOG` nor a configured filter is set.
pub const DEFAULT_FILTER: &str = "info,authgate=debug";

/// Output format for the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        })
    }
}

impl From<String> for LogFormat {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// Subscriber settings, loadable as part of a larger config
/// (`[logging]` in a TOML file) or from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
    /// `EnvFilter` directives, e.g. `warn,authgate=trace`.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl LogSettings {
    /// Read `LOG_FORMAT` and `RUST_LOG`; unset or empty values keep the
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut settings = Self::default();
        if let Some(format) = var("LOG_FORMAT") {
            settings.format = LogFormat::from(format);
        }
        if let Some(filter) = var("RUST_LOG") {
            settings.filter = filter;
        }
        settings
    }

    /// Install the global subscriber.
    ///
    /// Returns `false` when a subscriber was already installed, in which case
    /// nothing changes. Unparseable directives fall back to
    /// [`DEFAULT_FILTER`] and are reported once the subscriber is up.
    #[cfg(feature = "tracing")]
    pub fn init(&self) -> bool {
        use tracing_subscriber::{fmt, EnvFilter};

        let (filter, rejected) = match EnvFilter::try_new(&self.filter) {
            Ok(filter) => (filter, None),
            Err(e) => (EnvFilter::new(DEFAULT_FILTER), Some(e)),
        };

        let installed = match self.format {
            LogFormat::Text => fmt().with_env_filter(filter).try_init(),
            LogFormat::Json => fmt()
                .json()
                .with_current_span(false)
                .with_env_filter(filter)
                .try_init(),
        }
        .is_ok();

        if let (true, Some(e)) = (installed, rejected) {
            tracing::warn!(filter = %self.filter, error = %e, "invalid log filter, using default");
        }
        installed
    }
}

/// Install the global subscriber from `LOG_FORMAT` and `RUST_LOG`.
#[cfg(feature = "tracing")]
pub fn init_logging_from_env() -> bool {
    LogSettings::from_env().init()
}
