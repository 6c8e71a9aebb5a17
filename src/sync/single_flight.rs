//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了请求合并（单飞）机制：同一请求标识的并发查找共享一次执行结果。

use crate::error::{CacheError, Result};
use crate::value::CacheValue;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tracing::debug;

type SharedResult<V> = std::result::Result<Option<V>, Arc<CacheError>>;
type Flight<V> = Shared<BoxFuture<'static, SharedResult<V>>>;

/// 单飞管理器
///
/// 以请求标识为键保存正在执行的查找。后到的调用方等待同一个结果，执行完成后条目被移除。
pub struct SingleFlight<V: CacheValue> {
    /// 正在执行的查找
    in_flight: Arc<DashMap<String, Flight<V>>>,
}

impl<V: CacheValue> Default for SingleFlight<V> {
    fn default() -> Self {
        Self {
            in_flight: Arc::new(DashMap::new()),
        }
    }
}

impl<V: CacheValue> SingleFlight<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 执行或加入一次查找
    ///
    /// # 参数
    ///
    /// * `key` - 请求标识
    /// * `make` - 没有同标识查找在执行时，用于创建查找的函数
    ///
    /// # 返回值
    ///
    /// 返回查找结果。失败时，最后一个取得结果的调用方拿到原始错误，其余调用方拿到 `CacheError::Shared`
    pub async fn run<F>(&self, key: &str, make: F) -> Result<Option<V>>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Option<V>>>,
    {
        let flight = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                debug!("Joining in-flight lookup: key={}", key);
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                debug!("Starting lookup: key={}", key);
                let registry = Arc::downgrade(&self.in_flight);
                let owned_key = key.to_string();
                let lookup = make();
                let flight = async move {
                    let result = lookup.await.map_err(Arc::new);
                    if let Some(registry) = registry.upgrade() {
                        registry.remove(&owned_key);
                    }
                    result
                }
                .boxed()
                .shared();
                entry.insert(flight.clone());
                flight
            }
        };

        flight
            .await
            .map_err(|e| Arc::try_unwrap(e).unwrap_or_else(CacheError::Shared))
    }

    /// 正在执行的查找数量
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
