//! Shared utilities and common types for the CraftConnect server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error types and response structures
//! - Utility functions (email and phone validation, log masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CorsConfig, DatabaseConfig, DeliveryConfig, Environment,
    LoggingConfig, ServerConfig, StoreBackend, VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, HealthResponse, HealthStatus, ServiceHealth};
pub use utils::{email, phone};
