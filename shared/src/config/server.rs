//! Server configuration module

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Upper bound for a single verification/account operation, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: 0,
            request_timeout: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            workers: std::env::var("SERVER_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.workers),
            request_timeout: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin (development only)
    pub allowed_origins: Vec<String>,

    /// Preflight cache lifetime in seconds
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![String::from("http://localhost:3000")],
            max_age: default_cors_max_age(),
        }
    }
}

impl CorsConfig {
    /// Read a comma separated `CORS_ALLOWED_ORIGINS`
    pub fn from_env() -> Self {
        match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(origins) => Self {
                allowed_origins: origins
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect(),
                ..Default::default()
            },
            Err(_) => Self::default(),
        }
    }
}

fn default_request_timeout() -> u64 {
    15
}

fn default_cors_max_age() -> usize {
    3600
}
