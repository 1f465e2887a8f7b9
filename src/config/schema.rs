//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the reader.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default `User-Agent`, `response-reader/<version>`.
pub const DEFAULT_USER_AGENT: &str = concat!("response-reader/", env!("CARGO_PKG_VERSION"));

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ReaderConfig {
    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Entity decoding settings.
    pub decoding: DecodingConfig,

    /// HTTP client settings.
    pub client: ClientConfig,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Entity decoding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DecodingConfig {
    /// Fail with `UnsupportedMediaType` when a typed entity is requested and
    /// the response has no `Content-Type`. When false, `*/*` is used.
    pub require_content_type: bool,

    /// Maximum entity size in bytes.
    pub max_entity_bytes: u64,

    /// Register the JSON decoder (`serde_json::Value`).
    pub json: bool,

    /// Register the UTF-8 text decoder.
    pub text: bool,

    /// Register the raw bytes decoder.
    pub bytes: bool,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            require_content_type: false,
            max_entity_bytes: 10 * 1024 * 1024, // 10MB
            json: true,
            text: true,
            bytes: true,
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL that relative request paths resolve against.
    pub endpoint: String,

    pub user_agent: String,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}
