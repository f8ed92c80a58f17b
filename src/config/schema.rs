//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::{HostLayout, DEFAULT_SUFFIX_LABELS};

/// Root configuration for the region edge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Hostname grammar and URL reconstruction.
    pub hosts: HostsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Demonstration page settings.
    pub page: PageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

impl EdgeConfig {
    /// Host layout described by this configuration.
    pub fn layout(&self) -> HostLayout {
        HostLayout::new(self.hosts.suffix_labels)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Hostname grammar configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostsConfig {
    /// Trailing labels forming the fixed base suffix
    /// (3 for `reserved.example.com`, 2 for `example.com`).
    pub suffix_labels: usize,

    /// Scheme assumed when the request carries none.
    pub default_scheme: String,

    /// Honour `X-Forwarded-Proto` from the fronting CDN.
    pub trust_forwarded_proto: bool,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            suffix_labels: DEFAULT_SUFFIX_LABELS,
            default_scheme: "https".to_string(),
            trust_forwarded_proto: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Demonstration page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// Page heading.
    pub title: String,

    /// Regions offered as link sections.
    pub regions: Vec<String>,

    /// Paths linked in every section.
    pub paths: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Hello World!".to_string(),
            regions: vec!["ca".to_string()],
            paths: vec!["/".to_string(), "/foo".to_string(), "/bar".to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

pub(crate) const PLACEHOLDER_API_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: PLACEHOLDER_API_KEY.to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Add hardening response headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024, // 64KB, the edge never reads bodies
        }
    }
}
