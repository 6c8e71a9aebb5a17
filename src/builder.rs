//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块根据配置构建分层缓存，负责初始化并按声明顺序注册所有缓存层。

use crate::backend::{FileTier, MemoryTier, RedisTier};
use crate::client::TieredCache;
use crate::config::{Config, TierConfig};
use crate::error::{CacheError, Result};
use crate::registry::SharedTier;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// 根据配置构建字节值的分层缓存
///
/// 缓存层按配置中的顺序追加；回源函数需要调用方另行设置
///
/// # 参数
///
/// * `config` - 分层缓存配置
///
/// # 返回值
///
/// 返回构建好的分层缓存，配置无效或后端连接失败时返回错误
#[instrument(skip(config), level = "info", fields(cache = %config.cache.name, tier_count = config.tiers.len()))]
pub async fn build_cache(config: &Config) -> Result<TieredCache<Vec<u8>>> {
    config.validate().map_err(CacheError::Configuration)?;

    let mut cache = TieredCache::new()
        .with_name(config.cache.name.clone())
        .with_empty_value_policy(config.cache.empty_values);

    for tier_config in &config.tiers {
        let tier = build_tier(tier_config).await?;
        match tier_config.label() {
            Some(label) => cache.append_shared_tier_labeled(label, tier)?,
            None => cache.append_shared_tier(tier)?,
        };
    }

    info!(
        "Tiered cache '{}' initialized with {} tiers",
        config.cache.name,
        cache.tiers().len()
    );
    Ok(cache)
}

/// 根据单个缓存层配置创建后端
pub async fn build_tier(config: &TierConfig) -> Result<SharedTier<Vec<u8>>> {
    let tier: SharedTier<Vec<u8>> = match config {
        TierConfig::Memory(c) => Arc::new(MemoryTier::new(
            c.key.clone(),
            c.max_capacity,
            Some(Duration::from_secs(c.ttl_secs)),
        )),
        TierConfig::File(c) => Arc::new(FileTier::new(c.path.clone())),
        TierConfig::Redis(c) => Arc::new(RedisTier::new(c).await?),
    };
    Ok(tier)
}
