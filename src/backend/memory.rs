//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了内存缓存层，基于Moka实现。

use crate::error::Result;
use crate::tier::Tier;
use crate::value::CacheValue;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, instrument};

/// 内存存储
///
/// 多个内存缓存层可以共享同一个存储，每个缓存层绑定其中一个键
#[derive(Clone)]
pub struct MemoryStore<V: CacheValue> {
    cache: Cache<String, V>,
}

impl<V: CacheValue> MemoryStore<V> {
    /// 创建新的内存存储
    ///
    /// # 参数
    ///
    /// * `capacity` - 最大条目数
    /// * `ttl` - 条目存活时间，None表示不过期
    pub fn new(capacity: u64, ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder().max_capacity(capacity);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            cache: builder.build(),
        }
    }

    /// 创建绑定到指定键的缓存层
    pub fn tier(&self, key: impl Into<String>) -> MemoryTier<V> {
        MemoryTier {
            store: self.clone(),
            key: key.into(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: &str, value: V) {
        self.cache.insert(key.to_string(), value).await;
    }

    pub async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

/// 内存缓存层
#[derive(Clone)]
pub struct MemoryTier<V: CacheValue> {
    store: MemoryStore<V>,
    key: String,
}

impl<V: CacheValue> MemoryTier<V> {
    /// 创建使用独立存储的内存缓存层
    pub fn new(key: impl Into<String>, capacity: u64, ttl: Option<Duration>) -> Self {
        MemoryStore::new(capacity, ttl).tier(key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl<V: CacheValue> Tier<V> for MemoryTier<V> {
    #[instrument(skip(self), level = "debug", fields(key = %self.key))]
    async fn fetch(&self) -> Result<Option<V>> {
        let value = self.store.get(&self.key).await;
        debug!("Memory fetch: key={}, found={}", self.key, value.is_some());
        Ok(value)
    }

    #[instrument(skip(self, value), level = "debug", fields(key = %self.key))]
    async fn store(&self, value: &V) -> Result<()> {
        self.store.insert(&self.key, value.clone()).await;
        debug!("Memory store: key={}", self.key);
        Ok(())
    }
}
