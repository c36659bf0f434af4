//! # authgate-core
//!
//! Plumbing shared by the authgate crates: layered configuration loading,
//! logging initialisation, and the JSON error-response contract used by
//! every rejection the gate produces.
//!
//! ## Features
//!
//! - `tracing` - Enable logging initialisation with tracing-subscriber

mod config;
mod error;
mod logging;

pub use config::{ConfigBuilder, ConfigError, ConfigFormat};
pub use error::{status_to_error_code, ErrorResponse, HttpError};
pub use logging::{LogFormat, LogSettings, DEFAULT_FILTER};

#[cfg(feature = "tracing")]
pub use logging::init_logging_from_env;
