use std::fmt;
use std::net::SocketAddr;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid MODE: {0}. Must be 'server' or 'stdio'")]
    InvalidMode(String),
    #[error("PORT cannot be 0")]
    ZeroPort,
}

pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
    pub transcription: TranscriptionConfig,
}

/// Settings for the Gemini transcription backend. Loadable from the
/// `[transcription]` table of `CONFIG_FILE`; env vars win.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_ms: Option<u64>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_ms: None,
        }
    }
}

impl fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    transcription: TranscriptionConfig,
}

impl Config {
    /// Environment only; `CONFIG_FILE` is ignored.
    #[cfg(test)]
    pub fn from_env() -> Self {
        Self::with_env_overrides(TranscriptionConfig::default())
    }

    /// `CONFIG_FILE` (if set) first, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("CONFIG_FILE") {
            Ok(path) if !path.trim().is_empty() => {
                let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                parse_transcription_toml(&raw)
                    .map_err(|source| ConfigError::Parse { path, source })?
            }
            _ => TranscriptionConfig::default(),
        };
        Ok(Self::with_env_overrides(base))
    }

    fn with_env_overrides(mut transcription: TranscriptionConfig) -> Self {
        let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        if let Some(key) = non_empty_env("GEMINI_API_KEY") {
            transcription.api_key = Some(key);
        }
        if let Some(base) = non_empty_env("GEMINI_BASE_URL") {
            transcription.base_url = base;
        }
        if let Some(model) = non_empty_env("GEMINI_MODEL") {
            transcription.model = model;
        }
        if let Some(ms) = non_empty_env("GEMINI_TIMEOUT_MS").and_then(|s| s.parse::<u64>().ok()) {
            transcription.timeout_ms = Some(ms);
        }

        Self {
            mode,
            port,
            transcription,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.mode.as_str(), "server" | "stdio") {
            return Err(ConfigError::InvalidMode(self.mode.clone()));
        }
        if self.mode == "server" && self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        Ok(())
    }

    pub fn is_stdio(&self) -> bool {
        self.mode == "stdio"
    }

    pub fn bind_addr(&self) -> SocketAddr {
        ([0, 0, 0, 0], self.port).into()
    }
}

pub fn parse_transcription_toml(raw: &str) -> Result<TranscriptionConfig, toml::de::Error> {
    toml::from_str::<FileConfig>(raw).map(|f| f.transcription)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
