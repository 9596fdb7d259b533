//! Configuration management for the nova application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. It covers where data is stored and how
//! reflection replies are generated.
//!
//! # Environment Variables
//!
//! - `NOVA_DIR`: Path to the data directory (defaults to ~/.nova)
//! - `NOVA_GENERATOR`: Reply generator, `canned` (default) or `ollama`
//! - `NOVA_OLLAMA_URL`: Ollama API base URL (defaults to http://127.0.0.1:11434)
//! - `NOVA_CHAT_MODEL`: Ollama chat model (defaults to llama3.2:3b)
//! - `NOVA_REPLY_TIMEOUT_SECS`: Upper bound on a single reply generation (defaults to 30)
//! - `NOVA_REPLY_DELAY_MS`: Simulated latency of canned replies (defaults to 1200)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DEFAULT_CHAT_MODEL, DEFAULT_DATA_SUBDIR, DEFAULT_OLLAMA_URL, DEFAULT_REPLY_DELAY_MS,
    DEFAULT_REPLY_TIMEOUT_SECS, ENV_VAR_HOME, ENV_VAR_NOVA_CHAT_MODEL, ENV_VAR_NOVA_DIR,
    ENV_VAR_NOVA_GENERATOR, ENV_VAR_NOVA_OLLAMA_URL, ENV_VAR_NOVA_REPLY_DELAY_MS,
    ENV_VAR_NOVA_REPLY_TIMEOUT_SECS, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which backend produces reflection replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    /// Random open-ended prompts, no network.
    #[default]
    Canned,
    /// A local Ollama chat model.
    Ollama,
}

impl FromStr for GeneratorKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canned" => Ok(GeneratorKind::Canned),
            "ollama" => Ok(GeneratorKind::Ollama),
            other => Err(AppError::Config(format!(
                "Unknown reply generator '{}'. Expected 'canned' or 'ollama'",
                other
            ))),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Canned => write!(f, "canned"),
            GeneratorKind::Ollama => write!(f, "ollama"),
        }
    }
}

/// Configuration for the nova application.
///
/// # Examples
///
/// Starting from defaults and pointing at a data directory:
/// ```
/// use nova::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/nova"),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use nova::Config;
/// use std::env;
///
/// env::set_var("NOVA_DIR", "/custom/nova/path");
///
/// let config = Config::load().expect("Failed to load configuration");
/// ```
#[derive(Clone)]
pub struct Config {
    /// Directory where journal entries and survey data are stored.
    pub data_dir: PathBuf,

    /// Backend used to generate reflection replies.
    pub generator: GeneratorKind,

    /// Base URL of the Ollama API. Only used with `GeneratorKind::Ollama`.
    pub ollama_url: String,

    /// Ollama chat model. Only used with `GeneratorKind::Ollama`.
    pub chat_model: String,

    /// Upper bound on one reply generation before the fallback reply is used.
    pub reply_timeout: Duration,

    /// Simulated latency of canned replies.
    pub reply_delay: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("generator", &self.generator)
            .field("ollama_url", &self.ollama_url)
            .field("chat_model", &self.chat_model)
            .field("reply_timeout", &self.reply_timeout)
            .field("reply_delay", &self.reply_delay)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            generator: GeneratorKind::Canned,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            reply_timeout: Duration::from_secs(DEFAULT_REPLY_TIMEOUT_SECS),
            reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
        }
    }
}

/// Reads an optional non-negative integer environment variable.
fn env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
            AppError::Config(format!(
                "{} must be a non-negative integer, got '{}'",
                name, raw
            ))
        }),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory path is expanded with `shellexpand`, so `~` and
    /// environment variable references are allowed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - Neither `NOVA_DIR` nor `HOME` is set
    /// - The data directory path expansion fails or yields an empty path
    /// - `NOVA_GENERATOR` names an unknown generator
    /// - A numeric variable is not a non-negative integer
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nova::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Replies generated by: {}", config.generator),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        // Get data directory from NOVA_DIR, fallback to ~/.nova
        let data_dir_str = match env::var(ENV_VAR_NOVA_DIR) {
            Ok(dir) => dir,
            Err(_) => match env::var(ENV_VAR_HOME) {
                Ok(home) if !home.is_empty() => format!("{}/{}", home, DEFAULT_DATA_SUBDIR),
                _ => {
                    return Err(AppError::Config(format!(
                        "{} is not set; set {} to choose a data directory",
                        ENV_VAR_HOME, ENV_VAR_NOVA_DIR
                    )))
                }
            },
        };

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let generator = match env::var(ENV_VAR_NOVA_GENERATOR) {
            Ok(raw) => raw.parse()?,
            Err(_) => GeneratorKind::default(),
        };

        let ollama_url =
            env::var(ENV_VAR_NOVA_OLLAMA_URL).unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let chat_model =
            env::var(ENV_VAR_NOVA_CHAT_MODEL).unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());

        let reply_timeout = Duration::from_secs(env_u64(
            ENV_VAR_NOVA_REPLY_TIMEOUT_SECS,
            DEFAULT_REPLY_TIMEOUT_SECS,
        )?);
        let reply_delay = Duration::from_millis(env_u64(
            ENV_VAR_NOVA_REPLY_DELAY_MS,
            DEFAULT_REPLY_DELAY_MS,
        )?);

        Ok(Config {
            data_dir,
            generator,
            ollama_url,
            chat_model,
            reply_timeout,
            reply_delay,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path is empty or relative
    /// - The reply timeout is zero
    /// - The Ollama URL is not an http(s) URL or the chat model is empty,
    ///   when the Ollama generator is selected
    ///
    /// # Examples
    ///
    /// ```
    /// use nova::Config;
    /// use std::path::PathBuf;
    ///
    /// let relative = Config {
    ///     data_dir: PathBuf::from("relative/path"),
    ///     ..Config::default()
    /// };
    /// assert!(relative.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        if self.reply_timeout.is_zero() {
            return Err(AppError::Config(format!(
                "{} must be greater than zero",
                ENV_VAR_NOVA_REPLY_TIMEOUT_SECS
            )));
        }

        if self.generator == GeneratorKind::Ollama {
            if !(self.ollama_url.starts_with("http://") || self.ollama_url.starts_with("https://"))
            {
                return Err(AppError::Config(format!(
                    "Ollama URL must start with http:// or https://, got '{}'",
                    self.ollama_url
                )));
            }

            if self.chat_model.trim().is_empty() {
                return Err(AppError::Config("Chat model name is empty".to_string()));
            }
        }

        Ok(())
    }
}
