//! Configuration management for the travel planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TravelPlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the travel planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelPlannerConfig {
    /// Listening addresses for both HTTP services
    pub server: ServerConfig,
    /// How the agent tools reach the travel data service
    pub travel_api: TravelApiConfig,
    /// Chat-completion provider settings
    pub llm: LlmConfig,
    /// Behavior of each lookup for cities outside the static tables
    pub lookups: LookupPolicies,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// OpenTelemetry export
    pub telemetry: TelemetryConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Port of the travel data service
    pub data_port: u16,
    /// Port of the conversational `/query` endpoint
    pub agent_port: u16,
    /// Upper bound for a whole HTTP request, including every model and tool call
    pub request_timeout_seconds: u32,
}

/// Travel data service client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelApiConfig {
    /// Base URL of the travel data service
    pub base_url: String,
    /// Per-call timeout in seconds
    pub timeout_seconds: u32,
    /// Retries for transient failures; zero keeps the fail-fast behavior
    pub max_retries: u32,
}

/// Chat-completion provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI compatible API
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// API key, falls back to `OPENAI_API_KEY`
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    /// Per-call timeout in seconds
    pub timeout_seconds: u32,
    /// Maximum model/tool round trips per turn
    pub max_tool_rounds: u32,
}

/// What a lookup does when the city is not in its table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissPolicy {
    /// Answer with a sentinel value
    Fallback,
    /// Fail with an unknown location error
    Fail,
}

/// Per-endpoint miss policies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LookupPolicies {
    pub flights: MissPolicy,
    pub hotels: MissPolicy,
    pub weather: MissPolicy,
    pub activities: MissPolicy,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// OpenTelemetry export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    /// OTLP/HTTP collector base URL, signal paths are appended
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
    /// Extra export headers such as ingestion keys
    pub headers: HashMap<String, String>,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_data_port() -> u16 {
    8000
}

fn default_agent_port() -> u16 {
    8001
}

fn default_request_timeout() -> u32 {
    120
}

fn default_travel_api_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_travel_api_timeout() -> u32 {
    10
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout() -> u32 {
    60
}

fn default_max_tool_rounds() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_service_name() -> String {
    "travel-planner".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            data_port: default_data_port(),
            agent_port: default_agent_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for TravelApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_travel_api_base_url(),
            timeout_seconds: default_travel_api_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            temperature: None,
            timeout_seconds: default_llm_timeout(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

impl Default for LookupPolicies {
    fn default() -> Self {
        // Weather is the only lookup without a sentinel.
        Self {
            flights: MissPolicy::Fallback,
            hotels: MissPolicy::Fallback,
            weather: MissPolicy::Fail,
            activities: MissPolicy::Fallback,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: None,
            service_name: default_service_name(),
            headers: HashMap::new(),
        }
    }
}

impl TravelApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl LlmConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }

    /// The configured API key, required by the agent server
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            TravelPlannerError::config(
                "No LLM API key configured. Set llm.api_key or OPENAI_API_KEY.",
            )
            .into()
        })
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.into())
    }

    #[must_use]
    pub fn data_addr(&self) -> String {
        format!("{}:{}", self.host, self.data_port)
    }

    #[must_use]
    pub fn agent_addr(&self) -> String {
        format!("{}:{}", self.host, self.agent_port)
    }
}

impl TravelPlannerConfig {
    /// Load configuration from `config_path` (or the default location) and
    /// `TRAVEL_PLANNER_*` environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with TRAVEL_PLANNER_ prefix
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_PLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelPlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if config.llm.api_key.is_none() {
            config.llm.api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-planner").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.travel_api.base_url.is_empty() {
            self.travel_api.base_url = default_travel_api_base_url();
        }
        if self.travel_api.timeout_seconds == 0 {
            self.travel_api.timeout_seconds = default_travel_api_timeout();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.timeout_seconds == 0 {
            self.llm.timeout_seconds = default_llm_timeout();
        }
        if self.llm.max_tool_rounds == 0 {
            self.llm.max_tool_rounds = default_max_tool_rounds();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.telemetry.service_name.is_empty() {
            self.telemetry.service_name = default_service_name();
        }
        self.travel_api.base_url = self.travel_api.base_url.trim_end_matches('/').to_string();
        self.llm.base_url = self.llm.base_url.trim_end_matches('/').to_string();
        if let Some(endpoint) = self.telemetry.otlp_endpoint.as_mut() {
            *endpoint = endpoint.trim_end_matches('/').to_string();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.travel_api.timeout_seconds > 300 {
            return Err(
                TravelPlannerError::config("Travel API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.travel_api.max_retries > 10 {
            return Err(TravelPlannerError::config("Travel API max retries cannot exceed 10").into());
        }

        if self.llm.timeout_seconds > 300 {
            return Err(TravelPlannerError::config("LLM timeout cannot exceed 300 seconds").into());
        }

        if self.llm.max_tool_rounds > 50 {
            return Err(TravelPlannerError::config("LLM max tool rounds cannot exceed 50").into());
        }

        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(
                    TravelPlannerError::config("LLM temperature must be between 0.0 and 2.0").into(),
                );
            }
        }

        if self.server.request_timeout_seconds > 900 {
            return Err(
                TravelPlannerError::config("Request timeout cannot exceed 900 seconds").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelPlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelPlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Travel API base URL", &self.travel_api.base_url),
            ("LLM base URL", &self.llm.base_url),
        ] {
            if !is_http_url(url) {
                return Err(TravelPlannerError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.telemetry.enabled {
            match &self.telemetry.otlp_endpoint {
                Some(endpoint) if is_http_url(endpoint) => {}
                _ => {
                    return Err(TravelPlannerError::config(
                        "Telemetry is enabled but telemetry.otlp_endpoint is not an HTTP(S) URL",
                    )
                    .into());
                }
            }
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
