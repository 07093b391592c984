//! Process-wide settings for the summarization collaborator.
//!
//! A [`Config`] is loaded once at startup and never mutated afterwards. The
//! API key comes from `OPENAI_API_KEY` (flag or environment); a TOML secrets
//! file holding the same key overrides it when present.

use crate::error::{Error, IoError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default raw-message buffer capacity.
pub const DEFAULT_MAX_RAW_MESSAGES: usize = 10;

/// Default chat model used for summaries.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Default timeout for one summarization call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default location of the secrets file.
pub const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";

/// Immutable runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// OpenAI API key, if one was found.
    pub api_key: Option<String>,

    /// Chat model name.
    pub model: String,

    /// Capacity of each conversation's raw buffer.
    pub max_raw_messages: usize,

    /// Upper bound on a single summarization call.
    pub timeout: Duration,
}

/// Secrets file layout. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct Secrets {
    #[serde(rename = "OPENAI_API_KEY")]
    openai_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_raw_messages: DEFAULT_MAX_RAW_MESSAGES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Keep the key out of logs and panic messages.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_raw_messages", &self.max_raw_messages)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Builds a validated configuration.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Key from the flag or environment (blank counts as absent).
    /// * `secrets_path` - Optional TOML secrets file; a key found there wins.
    /// * `model` - Chat model name.
    /// * `max_raw_messages` - Raw buffer capacity, must be positive.
    /// * `timeout_secs` - Summarization timeout, must be positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero capacity or timeout, or an
    /// unreadable or malformed secrets file.
    pub fn load(
        api_key: Option<String>,
        secrets_path: Option<&Path>,
        model: String,
        max_raw_messages: usize,
        timeout_secs: u64,
    ) -> Result<Self> {
        if max_raw_messages == 0 {
            return Err(Error::config("max raw messages must be positive"));
        }
        if timeout_secs == 0 {
            return Err(Error::config("timeout must be positive"));
        }

        let mut api_key = api_key.filter(|k| !k.trim().is_empty());
        if let Some(path) = secrets_path
            && let Some(secret) = read_secrets(path)?
        {
            tracing::debug!(path = %path.display(), "using API key from secrets file");
            api_key = Some(secret);
        }

        Ok(Self {
            api_key,
            model,
            max_raw_messages,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Returns the API key or a descriptive error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no key was configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::config(format!(
                "missing OpenAI API key; set OPENAI_API_KEY in the environment or in {DEFAULT_SECRETS_PATH}"
            ))
        })
    }
}

/// Default secrets path, relative to the working directory.
#[must_use]
pub fn default_secrets_path() -> PathBuf {
    PathBuf::from(DEFAULT_SECRETS_PATH)
}

/// Reads the API key from a secrets file; a missing file yields `None`.
fn read_secrets(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|e| IoError::ReadFailed {
        path: path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;
    let secrets: Secrets = toml::from_str(&text)?;
    Ok(secrets.openai_api_key.filter(|k| !k.trim().is_empty()))
}
