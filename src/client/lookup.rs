//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了分层查找和回填算法。

use super::OriginFn;
use crate::error::Result;
use crate::metrics::GLOBAL_METRICS;
use crate::registry::{SharedTier, TierRegistry};
use crate::status::{StatusMap, TierStatus};
use crate::value::{CacheValue, EmptyValuePolicy};
use std::time::Instant;
use tracing::{debug, warn};

/// 单次查找
///
/// 按注册顺序逐层探测，第一次命中即停止；全部未命中时调用一次回源函数。
/// 未命中的缓存层被压入回填栈，取得值后按探测的逆序逐层写入，最外层最后写入。
pub(crate) struct Lookup<'a, V: CacheValue> {
    pub(crate) cache: &'a str,
    pub(crate) tiers: &'a TierRegistry<V>,
    pub(crate) origin: &'a OriginFn<V>,
    pub(crate) empty_values: EmptyValuePolicy,
}

impl<'a, V: CacheValue> Lookup<'a, V> {
    /// 执行查找
    ///
    /// # 参数
    ///
    /// * `status` - 需要记录各层探测结果时传入状态表
    ///
    /// # 返回值
    ///
    /// 返回解析出的值。任何缓存层或回源函数的错误都原样返回，回填失败时调用方拿不到值
    pub(crate) async fn run(&self, mut status: Option<&mut StatusMap>) -> Result<Option<V>> {
        let mut fill_stack: Vec<(&'a str, &'a SharedTier<V>)> = Vec::with_capacity(self.tiers.len());
        let mut found = None;

        for (position, (label, tier)) in self.tiers.iter().enumerate() {
            let start = Instant::now();
            let fetched = tier.fetch().await;
            GLOBAL_METRICS.record_duration(self.cache, label, "fetch", start.elapsed().as_secs_f64());

            let fetched = match fetched {
                Ok(v) => v,
                Err(e) => {
                    GLOBAL_METRICS.record_request(self.cache, label, "fetch", "error");
                    warn!("Tier fetch failed: cache={}, tier={}, error={}", self.cache, label, e);
                    return Err(e);
                }
            };

            match fetched.filter(|v| self.empty_values.is_present(v)) {
                Some(value) => {
                    debug!("Tier hit: cache={}, tier={}", self.cache, label);
                    GLOBAL_METRICS.record_request(self.cache, label, "fetch", "hit");
                    if let Some(status) = status.as_deref_mut() {
                        status.record(position, TierStatus::Hit);
                    }
                    found = Some(value);
                    break;
                }
                None => {
                    debug!("Tier miss: cache={}, tier={}", self.cache, label);
                    GLOBAL_METRICS.record_request(self.cache, label, "fetch", "miss");
                    if let Some(status) = status.as_deref_mut() {
                        status.record(position, TierStatus::Miss);
                    }
                    fill_stack.push((label, tier));
                }
            }
        }

        let value = match found {
            Some(value) => value,
            None => match self.load_origin().await? {
                Some(value) if self.empty_values.is_present(&value) => value,
                // 回源结果为空时不回填，原样返回
                other => return Ok(other),
            },
        };

        while let Some((label, tier)) = fill_stack.pop() {
            let start = Instant::now();
            let stored = tier.store(&value).await;
            GLOBAL_METRICS.record_duration(self.cache, label, "store", start.elapsed().as_secs_f64());
            if let Err(e) = stored {
                GLOBAL_METRICS.record_request(self.cache, label, "store", "error");
                warn!(
                    "Fill-back failed: cache={}, tier={}, remaining={}, error={}",
                    self.cache,
                    label,
                    fill_stack.len(),
                    e
                );
                return Err(e);
            }
            GLOBAL_METRICS.record_request(self.cache, label, "store", "ok");
            debug!("Filled tier: cache={}, tier={}", self.cache, label);
        }

        Ok(Some(value))
    }

    async fn load_origin(&self) -> Result<Option<V>> {
        debug!("All tiers missed, calling origin: cache={}", self.cache);
        let start = Instant::now();
        let loaded = (self.origin)().await;
        GLOBAL_METRICS.record_duration(self.cache, "origin", "load", start.elapsed().as_secs_f64());

        let result = match &loaded {
            Ok(Some(_)) => "ok",
            Ok(None) => "empty",
            Err(_) => "error",
        };
        GLOBAL_METRICS.record_request(self.cache, "origin", "load", result);
        loaded
    }
}
