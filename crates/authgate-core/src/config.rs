//! Layered configuration loading.
//!
//! Sources are applied in this order, later ones winning:
//! `.env` files (into the process environment), one structured config file,
//! then environment variables.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use crate::logging::LogSettings;

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The sources could not be merged or deserialized.
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    DotEnv,
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension. Bare dotfiles such as
    /// `.env` have no extension and yield `None`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "env" => Some(Self::DotEnv),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn looks_like_dotenv(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    name.starts_with(".env") || name == "env"
}

/// Configuration builder.
///
/// # Example
///
/// ```ignore
/// use authgate_core::ConfigBuilder;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Settings {
///     secret_key_name: String,
/// }
///
/// // AUTHGATE_SECRET_KEY_NAME=JWT_SECRET
/// let settings: Settings = ConfigBuilder::new()
///     .with_dotenv()
///     .with_env_prefix("AUTHGATE")
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    load_default_dotenv: bool,
    files: Vec<PathBuf>,
    env_prefix: Option<String>,
    #[cfg(feature = "tracing")]
    init_logging: bool,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `.env` from the current directory, if present.
    pub fn with_dotenv(mut self) -> Self {
        self.load_default_dotenv = true;
        self
    }

    /// Add a configuration file.
    ///
    /// `.env`-style files are applied to the process environment (several
    /// allowed, missing ones skipped). For `.toml`, `.yaml` and `.json` the
    /// last file added is the one loaded, and it must exist.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Only read environment variables named `{PREFIX}_*`, with the prefix
    /// stripped before matching fields.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Initialize logging from `LOG_FORMAT` and `RUST_LOG` once `.env` files
    /// have been applied. See [`LogSettings::from_env`].
    #[cfg(feature = "tracing")]
    pub fn with_logging_from_env(mut self) -> Self {
        self.init_logging = true;
        self
    }

    pub fn build<C: DeserializeOwned>(self) -> Result<C, ConfigError> {
        if self.load_default_dotenv {
            let _ = dotenvy::dotenv();
        }

        let mut structured: Option<&Path> = None;
        for path in &self.files {
            match ConfigFormat::from_path(path) {
                Some(ConfigFormat::DotEnv) => load_dotenv_file(path),
                Some(_) => structured = Some(path.as_path()),
                None if looks_like_dotenv(path) => load_dotenv_file(path),
                None => {}
            }
        }

        #[cfg(feature = "tracing")]
        if self.init_logging {
            LogSettings::from_env().init();
        }

        let mut builder = config::Config::builder();
        if let Some(path) = structured {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            builder = builder.add_source(config::File::from(path));
        }

        let config = builder
            .add_source(env_source(self.env_prefix.as_deref()))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

fn load_dotenv_file(path: &Path) {
    if path.exists() {
        if let Err(e) = dotenvy::from_path(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to load env file");
        }
    }
}

fn env_source(prefix: Option<&str>) -> config::Environment {
    let source = match prefix {
        Some(prefix) => config::Environment::with_prefix(prefix).prefix_separator("_"),
        None => config::Environment::default(),
    };
    source.separator("__").try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // `build` reads the process environment, which some tests write to.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[derive(Debug, Deserialize, Default)]
    struct TestConfig {
        #[serde(default)]
        secret_key_name: String,
        #[serde(default)]
        claim_key_name: Option<String>,
    }

    #[test]
    fn config_format_from_path() {
        assert_eq!(ConfigFormat::from_path("gate.toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path("gate.YAML"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path("gate.yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path("gate.json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path("secrets.env"), Some(ConfigFormat::DotEnv));
        assert_eq!(ConfigFormat::from_path("gate.ini"), None);
        assert_eq!(ConfigFormat::from_path(".env"), None);
    }

    #[test]
    fn loads_toml_file() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.toml");
        std::fs::write(
            &path,
            r#"
            secret_key_name = "JWT_SECRET"
            claim_key_name = "user_id"
            "#,
        )
        .unwrap();

        let config: TestConfig = ConfigBuilder::new()
            .with_env_prefix("AUTHGATE_CORE_TOML_TEST")
            .with_config_file(&path)
            .build()
            .unwrap();

        assert_eq!(config.secret_key_name, "JWT_SECRET");
        assert_eq!(config.claim_key_name.as_deref(), Some("user_id"));
    }

    #[test]
    fn loads_yaml_file() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.yaml");
        std::fs::write(&path, "secret_key_name: SIGNING_KEY\n").unwrap();

        let config: TestConfig = ConfigBuilder::new()
            .with_env_prefix("AUTHGATE_CORE_YAML_TEST")
            .with_config_file(&path)
            .build()
            .unwrap();

        assert_eq!(config.secret_key_name, "SIGNING_KEY");
        assert_eq!(config.claim_key_name, None);
    }

    #[test]
    fn last_structured_file_wins() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        std::fs::write(&first, r#"{"secret_key_name": "FIRST"}"#).unwrap();
        std::fs::write(&second, r#"{"secret_key_name": "SECOND"}"#).unwrap();

        let config: TestConfig = ConfigBuilder::new()
            .with_env_prefix("AUTHGATE_CORE_JSON_TEST")
            .with_config_file(&first)
            .with_config_file(&second)
            .build()
            .unwrap();

        assert_eq!(config.secret_key_name, "SECOND");
    }

    #[test]
    fn missing_file_is_not_found() {
        let _env = env_lock();
        let result: Result<TestConfig, _> = ConfigBuilder::new()
            .with_config_file("/nonexistent/path/gate.toml")
            .build();

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn env_prefix_overrides_file() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.toml");
        std::fs::write(&path, r#"secret_key_name = "FROM_FILE""#).unwrap();
        std::env::set_var("AUTHGATE_CORE_ENV_TEST_SECRET_KEY_NAME", "FROM_ENV");

        let config: TestConfig = ConfigBuilder::new()
            .with_env_prefix("AUTHGATE_CORE_ENV_TEST")
            .with_config_file(&path)
            .build()
            .unwrap();

        assert_eq!(config.secret_key_name, "FROM_ENV");
    }

    #[test]
    fn dotenv_file_populates_environment() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.test");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "AUTHGATE_CORE_DOTENV_TEST_VAR=loaded").unwrap();

        let _: TestConfig = ConfigBuilder::new()
            .with_env_prefix("AUTHGATE_CORE_DOTENV_TEST")
            .with_config_file(&path)
            .build()
            .unwrap();

        assert_eq!(
            std::env::var("AUTHGATE_CORE_DOTENV_TEST_VAR").as_deref(),
            Ok("loaded")
        );
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("/etc/gate.toml"));
        assert!(err.to_string().contains("/etc/gate.toml"));

        let err = ConfigError::Parse("missing field".to_string());
        assert!(err.to_string().contains("missing field"));
    }
}
