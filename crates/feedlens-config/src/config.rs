// crates/feedlens-config/src/config.rs
// ============================================================================
// Module: Feedlens Configuration
// Description: Configuration loading and validation for the analytics client.
// Purpose: Provide strict config parsing with hard limits and safe defaults.
// Dependencies: feedlens-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! When no file is named and none exists at the default location, built-in
//! defaults are used. Secrets are never printed by `Debug`.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use feedlens_core::ResourceKind;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "feedlens.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FEEDLENS_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a config path.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Maximum request timeout in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 300_000;
/// Default maximum response body size in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 8 * 1024 * 1024;
/// Upper bound for the response body size limit.
pub const MAX_RESPONSE_BYTES_LIMIT: u64 = 64 * 1024 * 1024;
/// Placeholder printed instead of secrets.
const REDACTED: &str = "<redacted>";

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedlensConfig {
    /// Analytics API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Fetch event logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FeedlensConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// Resolution order: `path`, then `FEEDLENS_CONFIG`, then `feedlens.toml`
    /// in the working directory when it exists, then built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        match resolved {
            Some(resolved) => Self::load_file(&resolved),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Loads and validates a specific config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or validated.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()
    }
}

/// Analytics API settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the analytics API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Maximum wait per request in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: u64,
    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Optional bearer credential.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Optional session cookie header value.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Per-resource route overrides.
    #[serde(default)]
    pub routes: RouteOverrides,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: default_user_agent(),
            bearer_token: None,
            session_cookie: None,
            routes: RouteOverrides::default(),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("user_agent", &self.user_agent)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| REDACTED))
            .field("session_cookie", &self.session_cookie.as_ref().map(|_| REDACTED))
            .field("routes", &self.routes)
            .finish()
    }
}

impl ApiConfig {
    /// Returns the route for a resource, honoring overrides.
    #[must_use]
    pub fn route(&self, resource: ResourceKind) -> &str {
        self.routes.get(resource).unwrap_or_else(|| resource.default_route())
    }

    /// Parses the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL is not a valid http(s) URL.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|_| ConfigError::Invalid("api.base_url must be a valid url".to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            _ => {
                return Err(ConfigError::Invalid(
                    "api.base_url must use http or https".to_string(),
                ));
            }
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(ConfigError::Invalid(
                "api.base_url must not embed credentials".to_string(),
            ));
        }
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid("api.base_url must include a host".to_string()));
        }
        Ok(url)
    }

    /// Validates API settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url()?;
        if !(1 ..= MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "api.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        if !(1 ..= MAX_RESPONSE_BYTES_LIMIT).contains(&self.max_response_bytes) {
            return Err(ConfigError::Invalid(format!(
                "api.max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES_LIMIT}"
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("api.user_agent must be non-empty".to_string()));
        }
        validate_secret("api.bearer_token", self.bearer_token.as_deref())?;
        validate_secret("api.session_cookie", self.session_cookie.as_deref())?;
        self.routes.validate()
    }
}

/// Per-resource route overrides; unset entries use the default route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteOverrides {
    /// Word cloud route.
    #[serde(default)]
    pub word_cloud: Option<String>,
    /// Feed analysis route.
    #[serde(default)]
    pub feed_analysis: Option<String>,
    /// Image analysis route.
    #[serde(default)]
    pub image_analysis: Option<String>,
    /// Post list route.
    #[serde(default)]
    pub post_list: Option<String>,
    /// Profile statistics route.
    #[serde(default)]
    pub statistics: Option<String>,
}

impl RouteOverrides {
    /// Returns the override for a resource, if any.
    #[must_use]
    pub fn get(&self, resource: ResourceKind) -> Option<&str> {
        let value = match resource {
            ResourceKind::WordCloud => &self.word_cloud,
            ResourceKind::FeedAnalysis => &self.feed_analysis,
            ResourceKind::ImageAnalysis => &self.image_analysis,
            ResourceKind::PostList => &self.post_list,
            ResourceKind::Statistics => &self.statistics,
        };
        value.as_deref()
    }

    /// Validates every configured override.
    fn validate(&self) -> Result<(), ConfigError> {
        for resource in ResourceKind::ALL {
            if let Some(route) = self.get(resource)
                && (!route.starts_with('/') || route.chars().any(char::is_whitespace))
            {
                return Err(ConfigError::Invalid(format!(
                    "api.routes.{resource} must start with '/' and contain no whitespace"
                )));
            }
        }
        Ok(())
    }
}

/// Fetch event logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Emit one JSON line per fetch to stderr.
    #[serde(default)]
    pub enabled: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default base URL.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Default timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default response size limit.
const fn default_max_response_bytes() -> u64 {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default User-Agent derived from the crate version.
fn default_user_agent() -> String {
    format!("feedlens/{}", env!("CARGO_PKG_VERSION"))
}

/// Rejects blank secrets.
fn validate_secret(field: &str, value: Option<&str>) -> Result<(), ConfigError> {
    match value {
        Some(secret) if secret.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{field} must be non-empty when set")))
        }
        Some(secret) if secret.contains(['\r', '\n']) => {
            Err(ConfigError::Invalid(format!("{field} must be a single line")))
        }
        _ => Ok(()),
    }
}

/// Resolves the config path from the caller, environment, or default file.
///
/// Returns `None` when nothing is named and the default file is absent.
fn resolve_path(
    path: Option<&Path>,
    env_path: Option<String>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = env_path.filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
