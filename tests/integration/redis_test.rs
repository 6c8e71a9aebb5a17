//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! Redis缓存层集成测试，Redis不可用时跳过

#[path = "../common/mod.rs"]
mod common;

use common::{is_redis_available, redis_url, setup_logging, unique_key};
use serial_test::serial;
use std::sync::Arc;
use tiered_cache::backend::redis_provider::DefaultRedisProvider;
use tiered_cache::backend::{MemoryTier, RedisTier};
use tiered_cache::config::RedisTierConfig;
use tiered_cache::error::CacheError;
use tiered_cache::{Tier, TierStatus, TieredCache};

fn redis_config(prefix: &str, ttl_secs: u64) -> RedisTierConfig {
    let mut config = RedisTierConfig::new(unique_key(prefix), ttl_secs);
    config.connection_string = redis_url().into();
    config
}

#[tokio::test]
#[serial]
async fn test_redis_tier_store_and_fetch() {
    setup_logging();
    if !is_redis_available().await {
        println!("跳过测试: Redis不可用");
        return;
    }

    let config = redis_config("store_fetch", 60);
    let tier = RedisTier::<Vec<u8>>::new(&config)
        .await
        .expect("Failed to create redis tier");

    assert_eq!(tier.fetch().await.unwrap(), None);
    tier.store(&b"payload".to_vec()).await.unwrap();
    assert_eq!(tier.fetch().await.unwrap(), Some(b"payload".to_vec()));

    let ttl = tier.remaining_ttl().await.unwrap();
    assert!(matches!(ttl, Some(t) if t <= 60 && t > 0));

    tier.delete().await.unwrap();
    assert_eq!(tier.fetch().await.unwrap(), None);
    assert_eq!(tier.remaining_ttl().await.unwrap(), None);
}

#[tokio::test]
#[serial]
async fn test_redis_refresh_ttl_on_read() {
    setup_logging();
    if !is_redis_available().await {
        println!("跳过测试: Redis不可用");
        return;
    }

    let mut config = redis_config("refresh_ttl", 100);
    config.refresh_ttl_on_read = true;
    let tier = RedisTier::<Vec<u8>>::new(&config).await.unwrap();
    tier.store(&b"v".to_vec()).await.unwrap();

    // 手动缩短过期时间，读取命中后应恢复为配置值
    let client = redis::Client::open(redis_url()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let _: i64 = redis::cmd("EXPIRE")
        .arg(tier.key())
        .arg(5)
        .query_async(&mut conn)
        .await
        .unwrap();
    assert!(tier.remaining_ttl().await.unwrap().unwrap() <= 5);

    assert_eq!(tier.fetch().await.unwrap(), Some(b"v".to_vec()));
    assert!(tier.remaining_ttl().await.unwrap().unwrap() > 5);

    tier.delete().await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_memory_over_redis_read_through() {
    setup_logging();
    if !is_redis_available().await {
        println!("跳过测试: Redis不可用");
        return;
    }

    let config = redis_config("read_through", 60);
    let redis_tier = RedisTier::<String>::new_with_provider(&config, Arc::new(DefaultRedisProvider))
        .await
        .unwrap();

    let mut cache = TieredCache::<String>::new().with_name("redis_read_through");
    cache
        .append_tier_labeled("memory", MemoryTier::new(config.key.clone(), 100, None))
        .unwrap()
        .append_tier_labeled("redis", redis_tier.clone())
        .unwrap()
        .set_origin(|| async { Ok(Some("from origin".to_string())) });

    let (value, status) = cache.get_with_status().await.unwrap();
    assert_eq!(value.as_deref(), Some("from origin"));
    assert_eq!(status.get("redis"), Some(TierStatus::Miss));
    assert_eq!(
        redis_tier.fetch().await.unwrap().as_deref(),
        Some("from origin")
    );

    // 新的内存层从Redis命中
    let mut second = TieredCache::<String>::new();
    second
        .append_tier_labeled("memory", MemoryTier::new(config.key.clone(), 100, None))
        .unwrap()
        .append_tier_labeled("redis", redis_tier.clone())
        .unwrap()
        .set_origin(|| async { Err(CacheError::Origin("should not be called".to_string())) });
    let (value, status) = second.get_with_status().await.unwrap();
    assert_eq!(value.as_deref(), Some("from origin"));
    assert_eq!(status.first_hit(), Some("redis"));

    redis_tier.delete().await.unwrap();
}

#[tokio::test]
async fn test_redis_connection_timeout() {
    let mut config = RedisTierConfig::new("unreachable", 60);
    // 不可路由地址
    config.connection_string = "redis://10.255.255.1:6379".to_string().into();
    config.connection_timeout_ms = 200;

    let result = RedisTier::<Vec<u8>>::new(&config).await;
    assert!(matches!(
        result,
        Err(CacheError::Timeout(_)) | Err(CacheError::RedisError(_))
    ));
}
