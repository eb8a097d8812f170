//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// The single backend origin every request is relayed to.
    pub backend: BackendConfig,

    /// Mount point and body handling of the relay route.
    pub relay: RouteConfig,

    /// Outbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,

    /// Maximum in-flight requests across all routes (backpressure).
    pub max_concurrent_requests: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
            max_concurrent_requests: 10_000,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Backend origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend API (e.g., "https://api.example.com").
    /// May carry a base path; must not carry a query or fragment.
    pub origin: String,

    /// Follow backend redirects instead of relaying them.
    pub follow_redirects: bool,
}

impl BackendConfig {
    /// The origin with any trailing `/` removed, ready to be joined with a sub-path.
    pub fn normalized_origin(&self) -> &str {
        self.origin.trim_end_matches('/')
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8080".to_string(),
            follow_redirects: true,
        }
    }
}

/// Relay route configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Path prefix under which every request is relayed (e.g., "/api/proxy").
    pub mount_prefix: String,

    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,

    /// What to do when the inbound body cannot be read.
    pub on_body_error: BodyErrorPolicy,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            mount_prefix: "/api/proxy".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            on_body_error: BodyErrorPolicy::default(),
        }
    }
}

/// Handling of inbound bodies that fail to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyErrorPolicy {
    /// Log, then forward the request without a body.
    #[default]
    Drop,
    /// Answer 400 without contacting the backend.
    Reject,
}

impl BodyErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyErrorPolicy::Drop => "drop",
            BodyErrorPolicy::Reject => "reject",
        }
    }
}

/// Timeout configuration for the outbound leg.
///
/// Unset values defer to the HTTP client's defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: Option<u64>,

    /// Total backend request timeout in seconds.
    pub request_secs: Option<u64>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
