//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 内存层和文件层组合的回填集成测试

#[path = "../common/mod.rs"]
mod common;

use common::{new_journal, setup_logging, OriginCounter, RecordingTier};
use std::time::Duration;
use tiered_cache::backend::{FileTier, MemoryStore, MemoryTier};
use tiered_cache::error::CacheError;
use tiered_cache::metrics::GLOBAL_METRICS;
use tiered_cache::{Tier, TierStatus, TieredCache};

fn counted_origin(cache: &mut TieredCache<Vec<u8>>, value: &'static [u8]) -> OriginCounter {
    let counter = OriginCounter::default();
    let c = counter.clone();
    cache.set_origin(move || {
        let c = c.clone();
        async move {
            c.hit();
            Ok(Some(value.to_vec()))
        }
    });
    counter
}

/// 内存层未命中、文件层命中时，值被提升到内存层
#[tokio::test]
async fn test_file_hit_promotes_to_memory() {
    setup_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("value.bin");
    std::fs::write(&path, b"on disk").unwrap();

    let store = MemoryStore::<Vec<u8>>::new(100, Some(Duration::from_secs(60)));
    let mut cache = TieredCache::<Vec<u8>>::new().with_name("promote_test");
    cache
        .append_tier_labeled("memory", store.tier("value"))
        .unwrap()
        .append_tier_labeled("disk", FileTier::new(&path))
        .unwrap();
    let counter = counted_origin(&mut cache, b"origin");

    let (value, status) = cache.get_with_status().await.unwrap();
    assert_eq!(value, Some(b"on disk".to_vec()));
    assert_eq!(status.get("memory"), Some(TierStatus::Miss));
    assert_eq!(status.get("disk"), Some(TierStatus::Hit));
    assert_eq!(store.get("value").await, Some(b"on disk".to_vec()));
    assert_eq!(counter.count(), 0);

    // 文件被删除后仍由内存层提供
    std::fs::remove_file(&path).unwrap();
    assert_eq!(cache.get().await.unwrap(), Some(b"on disk".to_vec()));
    assert_eq!(counter.count(), 0);
}

/// 全部未命中时回源，并写入文件层（包括不存在的父目录）和内存层
#[tokio::test]
async fn test_origin_fills_file_and_memory() {
    setup_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("value.bin");

    let mut cache = TieredCache::<Vec<u8>>::new().with_name("fill_both_test");
    cache
        .append_tier(MemoryTier::new("value", 100, None))
        .unwrap()
        .append_tier(FileTier::new(&path))
        .unwrap();
    let counter = counted_origin(&mut cache, b"fresh");

    assert_eq!(cache.get().await.unwrap(), Some(b"fresh".to_vec()));
    assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
    assert_eq!(counter.count(), 1);

    let (_, status) = cache.get_with_status().await.unwrap();
    assert_eq!(status.get("0"), Some(TierStatus::Hit));
    assert_eq!(status.get("1"), Some(TierStatus::Untouched));
    assert_eq!(counter.count(), 1);

    assert!(GLOBAL_METRICS.request_count("fill_both_test", "origin", "load", "ok") >= 1);
    assert!(GLOBAL_METRICS.request_count("fill_both_test", "1", "store", "ok") >= 1);
}

/// 外层写入失败时错误透传，但更深的文件层已经回填
#[tokio::test]
async fn test_outer_store_failure_after_file_fill() {
    setup_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("value.bin");

    let journal = new_journal();
    let outer = RecordingTier::failing_store("outer", &journal);
    let mut cache = TieredCache::<Vec<u8>>::new().with_name("store_failure_test");
    cache
        .append_tier_labeled("outer", outer.clone())
        .unwrap()
        .append_tier_labeled("disk", FileTier::new(&path))
        .unwrap();
    let counter = counted_origin(&mut cache, b"fresh");

    let err = cache.get().await.unwrap_err();
    assert!(matches!(err, CacheError::BackendError(_)));
    assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
    assert_eq!(counter.count(), 1);
    assert_eq!(
        GLOBAL_METRICS.request_count("store_failure_test", "outer", "store", "error"),
        1
    );

    // 下一次查找由文件层命中，不再回源，外层仍然写入失败
    let err = cache.get_with_status().await.unwrap_err();
    assert!(matches!(err, CacheError::BackendError(_)));
    assert_eq!(counter.count(), 1);
    assert_eq!(outer.fetch_count(), 2);
}

#[tokio::test]
async fn test_string_values_through_file_tier() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greeting.txt");
    let tier = FileTier::<String>::new(&path);
    assert_eq!(tier.fetch().await.unwrap(), None);

    let mut cache = TieredCache::<String>::new();
    cache.append_tier(tier.clone()).unwrap();
    cache.set_origin(|| async { Ok(Some("hello".to_string())) });
    assert_eq!(cache.get().await.unwrap(), Some("hello".to_string()));
    assert_eq!(tier.fetch().await.unwrap(), Some("hello".to_string()));

    std::fs::write(&path, [0xff, 0xfe]).unwrap();
    let err = cache.get().await.unwrap_err();
    assert!(matches!(err, CacheError::Decode(_)));
}
