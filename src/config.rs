//! Client configuration parsed from environment variables.

use canvas::engine::EngineConfig;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8787";
pub const DEFAULT_AUTOSAVE_MS: i64 = 2000;
pub const DEFAULT_HISTORY_DEPTH: usize = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Opaque bearer credential forwarded on every request.
    pub token: Option<String>,
    /// The "may persist" gate. When false, saves are skipped.
    pub persist: bool,
    pub autosave_ms: i64,
    pub history_depth: usize,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token: None,
            persist: true,
            autosave_ms: DEFAULT_AUTOSAVE_MS,
            history_depth: DEFAULT_HISTORY_DEPTH,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `WHITEBOARD_API_URL`: default `http://127.0.0.1:8787`
    /// - `WHITEBOARD_TOKEN`: bearer credential
    /// - `WHITEBOARD_PERSIST`: `false`/`0`/`no`/`off` disables saving
    /// - `WHITEBOARD_AUTOSAVE_MS`: default 2000
    /// - `WHITEBOARD_HISTORY_DEPTH`: default 50, minimum 1
    /// - `WHITEBOARD_REQUEST_TIMEOUT_SECS`: default 30
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).map_or(None, Some))
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("WHITEBOARD_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let token = lookup("WHITEBOARD_TOKEN").filter(|t| !t.trim().is_empty());
        let persist = match lookup("WHITEBOARD_PERSIST") {
            Some(raw) => parse_flag("WHITEBOARD_PERSIST", &raw)?,
            None => true,
        };

        Ok(Self {
            api_url,
            token,
            persist,
            autosave_ms: parse_or(&lookup, "WHITEBOARD_AUTOSAVE_MS", DEFAULT_AUTOSAVE_MS)?,
            history_depth: parse_or(&lookup, "WHITEBOARD_HISTORY_DEPTH", DEFAULT_HISTORY_DEPTH)?.max(1),
            request_timeout_secs: parse_or(&lookup, "WHITEBOARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
        })
    }

    /// Engine tunables derived from this config.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig { history_depth: self.history_depth, autosave_debounce_ms: self.autosave_ms }
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value: raw.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
