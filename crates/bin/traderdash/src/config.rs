//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `traderdash.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values. Credentials never live in the file; they
//! come from `TRADERDASH_USERNAME` / `TRADERDASH_PASSWORD` only.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Browser/driver settings.
    pub webdriver: WebDriverConfig,
    /// Run tunables.
    pub run: RunConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Driver endpoint and target application.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// Base URL of the chromedriver binary.
    pub url: String,
    /// URL of the trading application login page.
    pub app_url: String,
    /// Run browsers without visible windows.
    pub headless: bool,
}

/// Run tunables.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum concurrent batch workers; `0` picks the platform's
    /// available parallelism.
    pub max_concurrency: usize,
    /// Use the simulated browser instead of a real one.
    pub dry_run: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `traderdash.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("traderdash.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TRADERDASH_DRIVER_URL") {
            self.webdriver.url = val;
        }
        if let Ok(val) = std::env::var("TRADERDASH_APP_URL") {
            self.webdriver.app_url = val;
        }
        if let Ok(val) = std::env::var("TRADERDASH_HEADLESS") {
            self.webdriver.headless = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("TRADERDASH_CONCURRENCY") {
            if let Ok(n) = val.parse() {
                self.run.max_concurrency = n;
            }
        }
        if let Ok(val) = std::env::var("TRADERDASH_DRY_RUN") {
            self.run.dry_run = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("TRADERDASH_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.webdriver.url.is_empty() {
            return Err(ConfigError::Validation(
                "webdriver.url must not be empty".to_string(),
            ));
        }
        if !self.run.dry_run && self.webdriver.app_url.is_empty() {
            return Err(ConfigError::Validation(
                "webdriver.app_url is required unless run.dry_run is set".to_string(),
            ));
        }
        Ok(())
    }

    /// Worker cap for the run; `None` means pick automatically.
    #[must_use]
    pub fn max_concurrency(&self) -> Option<usize> {
        (self.run.max_concurrency > 0).then_some(self.run.max_concurrency)
    }
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9515".to_string(),
            app_url: String::new(),
            headless: false,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 0,
            dry_run: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "traderdash=info,traderdash_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
