//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了Redis缓存层，值以固定的过期时间写入一个键。

use super::redis_provider::{DefaultRedisProvider, RedisProvider};
use crate::config::RedisTierConfig;
use crate::error::{CacheError, Result};
use crate::tier::Tier;
use crate::value::BytesValue;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Redis缓存层
///
/// 读取使用 `GET`，命中且开启 `refresh_ttl_on_read` 时用 `EXPIRE` 刷新过期时间；
/// 写入使用 `SET key value EX ttl`
pub struct RedisTier<V: BytesValue> {
    manager: ConnectionManager,
    key: String,
    ttl_secs: u64,
    refresh_ttl_on_read: bool,
    command_timeout_ms: u64,
    _value: PhantomData<fn() -> V>,
}

impl<V: BytesValue> Clone for RedisTier<V> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            key: self.key.clone(),
            ttl_secs: self.ttl_secs,
            refresh_ttl_on_read: self.refresh_ttl_on_read,
            command_timeout_ms: self.command_timeout_ms,
            _value: PhantomData,
        }
    }
}

impl<V: BytesValue> std::fmt::Debug for RedisTier<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTier")
            .field("key", &self.key)
            .field("ttl_secs", &self.ttl_secs)
            .field("refresh_ttl_on_read", &self.refresh_ttl_on_read)
            .finish()
    }
}

impl<V: BytesValue> RedisTier<V> {
    /// 创建新的Redis缓存层
    ///
    /// # 参数
    ///
    /// * `config` - Redis缓存层配置
    ///
    /// # 返回值
    ///
    /// 返回新的RedisTier实例或错误
    #[instrument(skip(config), level = "info", name = "init_redis_tier", fields(key = %config.key))]
    pub async fn new(config: &RedisTierConfig) -> Result<Self> {
        Self::new_with_provider(config, Arc::new(DefaultRedisProvider)).await
    }

    /// 使用指定的Redis提供者创建缓存层
    pub async fn new_with_provider(
        config: &RedisTierConfig,
        provider: Arc<dyn RedisProvider>,
    ) -> Result<Self> {
        let manager = provider.get_connection_manager(config).await?;
        Ok(Self::from_manager(manager, config))
    }

    /// 复用已有连接创建缓存层
    ///
    /// 多个键共享同一个Redis时，可以只建立一次连接
    pub fn from_manager(manager: ConnectionManager, config: &RedisTierConfig) -> Self {
        Self {
            manager,
            key: config.key.clone(),
            ttl_secs: config.ttl_secs,
            refresh_ttl_on_read: config.refresh_ttl_on_read,
            command_timeout_ms: config.command_timeout_ms,
            _value: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// 查询键的剩余存活时间（秒），键不存在或没有过期时间时返回None
    pub async fn remaining_ttl(&self) -> Result<Option<u64>> {
        let mut conn = self.manager.clone();
        let ttl: i64 = self
            .with_timeout(redis::cmd("TTL").arg(&self.key).query_async(&mut conn))
            .await?;
        Ok((ttl > 0).then_some(ttl as u64))
    }

    /// 删除键
    pub async fn delete(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: i64 = self
            .with_timeout(redis::cmd("DEL").arg(&self.key).query_async(&mut conn))
            .await?;
        Ok(())
    }

    async fn with_timeout<T, F>(&self, command: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(Duration::from_millis(self.command_timeout_ms), command).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(CacheError::Timeout(format!(
                "Redis command on key {} timed out after {}ms",
                self.key, self.command_timeout_ms
            ))),
        }
    }
}

#[async_trait]
impl<V: BytesValue> Tier<V> for RedisTier<V> {
    #[instrument(skip(self), level = "debug", fields(key = %self.key))]
    async fn fetch(&self) -> Result<Option<V>> {
        let mut conn = self.manager.clone();
        let bytes: Option<Vec<u8>> = self
            .with_timeout(redis::cmd("GET").arg(&self.key).query_async(&mut conn))
            .await?;

        let Some(bytes) = bytes else {
            debug!("Redis fetch: key={}, found=false", self.key);
            return Ok(None);
        };

        if self.refresh_ttl_on_read {
            let _: i64 = self
                .with_timeout(
                    redis::cmd("EXPIRE")
                        .arg(&self.key)
                        .arg(self.ttl_secs)
                        .query_async(&mut conn),
                )
                .await?;
            debug!("Redis fetch: key={}, ttl refreshed to {}s", self.key, self.ttl_secs);
        }

        debug!("Redis fetch: key={}, value_len={}", self.key, bytes.len());
        V::from_bytes(bytes).map(Some)
    }

    #[instrument(skip(self, value), level = "debug", fields(key = %self.key))]
    async fn store(&self, value: &V) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = self
            .with_timeout(
                redis::cmd("SET")
                    .arg(&self.key)
                    .arg(value.as_bytes())
                    .arg("EX")
                    .arg(self.ttl_secs)
                    .query_async(&mut conn),
            )
            .await?;
        debug!(
            "Redis store: key={}, value_len={}, ttl={}s",
            self.key,
            value.as_bytes().len(),
            self.ttl_secs
        );
        Ok(())
    }
}
