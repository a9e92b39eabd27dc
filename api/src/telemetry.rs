//! Tracing subscriber setup for the server binary

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use cc_shared::config::{LogFormat, LoggingConfig};

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(config: &LoggingConfig) -> String {
    format!("{},actix_web=info,sqlx=warn", config.level)
}

/// Install the global subscriber; `RUST_LOG` overrides the configured level
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_configured_level() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Compact,
        };
        assert_eq!(default_filter(&config), "debug,actix_web=info,sqlx=warn");
    }
}
