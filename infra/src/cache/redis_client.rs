//! Redis client with connection retry and key helpers
//!
//! Wraps a multiplexed connection and retries transient failures with
//! exponential backoff.

use redis::{aio::MultiplexedConnection, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use cc_shared::config::CacheConfig;

use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Upper bound for the backoff between retries
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Redis client with retry logic
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
}

impl RedisClient {
    /// Connect using the retry settings from `config`
    ///
    /// # Example
    /// ```no_run
    /// use cc_shared::config::CacheConfig;
    /// use cc_infra::cache::RedisClient;
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let client = RedisClient::new(CacheConfig::new("redis://localhost:6379")).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::connect_with_retry(&client, config.max_retries, config.retry_delay_ms).await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    async fn connect_with_retry(
        client: &Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Connecting to Redis");

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        attempt = attempts,
                        max_retries,
                        error = %e,
                        "Failed to connect to Redis, retrying in {}ms",
                        delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Failed to connect to Redis");
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Apply the configured key prefix
    pub fn key(&self, key: &str) -> String {
        self.config.prefixed(key)
    }

    /// `SET key value EX seconds`
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        let key = key.to_string();
        let value = value.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            let value = value.clone();
            Box::pin(async move {
                redis::cmd("SET")
                    .arg(&key)
                    .arg(&value)
                    .arg("EX")
                    .arg(expiry_seconds.max(1))
                    .query_async::<_, ()>(&mut conn)
                    .await
            })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key = key.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            Box::pin(async move {
                redis::cmd("GET")
                    .arg(&key)
                    .query_async::<_, Option<String>>(&mut conn)
                    .await
            })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Returns whether the key existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = key.to_string();
        let deleted = self
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                Box::pin(async move {
                    redis::cmd("DEL")
                        .arg(&key)
                        .query_async::<_, u32>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(InfrastructureError::Cache)?;
        Ok(deleted > 0)
    }

    /// Run a Lua script against one key; not retried
    pub async fn eval_script(
        &self,
        script: &Script,
        key: &str,
        args: &[&str],
    ) -> Result<i64, InfrastructureError> {
        let mut conn = self.connection.clone();
        let mut invocation = script.key(key);
        for arg in args {
            invocation.arg(*arg);
        }
        invocation
            .invoke_async::<_, i64>(&mut conn)
            .await
            .map_err(InfrastructureError::Cache)
    }

    /// `PING`
    pub async fn health_check(&self) -> Result<(), InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move {
                    redis::cmd("PING")
                        .query_async::<_, String>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(InfrastructureError::Config(format!(
                "Unexpected PING response: {}",
                response
            )))
        }
    }

    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.config.max_retries && is_retriable_error(&e) => {
                    warn!(
                        attempt = attempts,
                        error = %e,
                        "Redis operation failed, retrying in {}ms",
                        delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Redis operation failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Connection-level failures are worth retrying; command errors are not
fn is_retriable_error(error: &RedisError) -> bool {
    error.is_io_error() || error.is_connection_dropped() || error.is_timeout()
}

/// Hide the password part of a Redis URL
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}
