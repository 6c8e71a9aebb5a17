//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了Redis连接提供者接口和默认实现。

use crate::config::RedisTierConfig;
use crate::error::{CacheError, Result};
use crate::utils::redaction::redact_connection_string;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use secrecy::ExposeSecret;
use tokio::time::{timeout, Duration};
use tracing::{debug, instrument};

#[async_trait]
pub trait RedisProvider: Send + Sync {
    async fn get_connection_manager(&self, config: &RedisTierConfig) -> Result<ConnectionManager>;
}

pub struct DefaultRedisProvider;

#[async_trait]
impl RedisProvider for DefaultRedisProvider {
    #[instrument(skip(self, config), level = "debug", fields(key = %config.key))]
    async fn get_connection_manager(&self, config: &RedisTierConfig) -> Result<ConnectionManager> {
        let connection_string = config.connection_string.expose_secret();
        let client = Client::open(connection_string)?;
        let manager = match timeout(
            Duration::from_millis(config.connection_timeout_ms),
            client.get_connection_manager(),
        )
        .await
        {
            Ok(res) => res?,
            Err(_) => {
                return Err(CacheError::Timeout(format!(
                    "Redis connection timed out after {}ms. Target: {}",
                    config.connection_timeout_ms,
                    redact_connection_string(connection_string)
                )));
            }
        };
        debug!(
            "Redis connection manager ready: target={}",
            redact_connection_string(connection_string)
        );
        Ok(manager)
    }
}
