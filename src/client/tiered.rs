//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了分层缓存客户端：管理缓存层注册表和回源函数，对外提供查找接口。

use super::lookup::Lookup;
use super::OriginFn;
use crate::error::{CacheError, Result};
use crate::registry::{SharedTier, TierRegistry};
use crate::status::StatusMap;
use crate::sync::SingleFlight;
use crate::tier::Tier;
use crate::value::{CacheValue, EmptyValuePolicy};
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, instrument};

/// 默认缓存名称，用于日志和指标
pub const DEFAULT_CACHE_NAME: &str = "default";

/// 分层缓存
///
/// 按注册顺序从最快的缓存层查到最慢的缓存层，全部未命中时调用回源函数，
/// 并把得到的值回填到所有被探测过且未命中的缓存层。
///
/// 查找只需要 `&self`，实例不保存任何单次查找的可变状态，可以通过 `Arc` 在多个任务间共享。
pub struct TieredCache<V: CacheValue> {
    /// 缓存名称
    name: Arc<str>,
    /// 缓存层注册表
    tiers: TierRegistry<V>,
    /// 回源函数
    origin: Option<OriginFn<V>>,
    /// 空值处理策略
    empty_values: EmptyValuePolicy,
    /// 请求合并
    single_flight: SingleFlight<V>,
}

impl<V: CacheValue> Default for TieredCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: CacheValue> std::fmt::Debug for TieredCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredCache")
            .field("name", &self.name)
            .field("tiers", &self.tiers)
            .field("has_origin", &self.origin.is_some())
            .field("empty_values", &self.empty_values)
            .finish()
    }
}

impl<V: CacheValue> TieredCache<V> {
    /// 创建空的分层缓存
    pub fn new() -> Self {
        Self {
            name: Arc::from(DEFAULT_CACHE_NAME),
            tiers: TierRegistry::new(),
            origin: None,
            empty_values: EmptyValuePolicy::default(),
            single_flight: SingleFlight::new(),
        }
    }

    /// 设置缓存名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Arc::from(name.into());
        self
    }

    /// 设置空值处理策略
    pub fn with_empty_value_policy(mut self, policy: EmptyValuePolicy) -> Self {
        self.empty_values = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn empty_value_policy(&self) -> EmptyValuePolicy {
        self.empty_values
    }

    /// 追加缓存层，标签自动分配为当前缓存层数量
    ///
    /// # 参数
    ///
    /// * `tier` - 缓存层实现
    ///
    /// # 返回值
    ///
    /// 返回自身以便链式调用；自动标签已被占用时返回 `CacheError::DuplicateLabel`
    pub fn append_tier<T: Tier<V> + 'static>(&mut self, tier: T) -> Result<&mut Self> {
        self.append_shared_tier(Arc::new(tier))
    }

    /// 以指定标签追加缓存层
    ///
    /// # 参数
    ///
    /// * `label` - 缓存层标签
    /// * `tier` - 缓存层实现
    ///
    /// # 返回值
    ///
    /// 返回自身以便链式调用；标签已存在时返回 `CacheError::DuplicateLabel`
    pub fn append_tier_labeled<T: Tier<V> + 'static>(
        &mut self,
        label: impl Into<String>,
        tier: T,
    ) -> Result<&mut Self> {
        self.append_shared_tier_labeled(label, Arc::new(tier))
    }

    /// 追加已共享的缓存层，标签自动分配
    pub fn append_shared_tier(&mut self, tier: SharedTier<V>) -> Result<&mut Self> {
        let label = self.tiers.append(tier)?;
        info!("Tier appended: cache={}, label={}", self.name, label);
        Ok(self)
    }

    /// 以指定标签追加已共享的缓存层
    pub fn append_shared_tier_labeled(
        &mut self,
        label: impl Into<String>,
        tier: SharedTier<V>,
    ) -> Result<&mut Self> {
        let label = label.into();
        self.tiers.append_labeled(label.clone(), tier)?;
        info!("Tier appended: cache={}, label={}", self.name, label);
        Ok(self)
    }

    /// 根据标签获取缓存层
    pub fn get_tier(&self, label: &str) -> Option<&SharedTier<V>> {
        self.tiers.get(label)
    }

    /// 获取缓存层注册表
    pub fn tiers(&self) -> &TierRegistry<V> {
        &self.tiers
    }

    /// 设置回源函数，替换之前设置的回源函数
    ///
    /// # 参数
    ///
    /// * `origin` - 无参数的异步函数，返回权威数据源中的值
    pub fn set_origin<F, Fut>(&mut self, origin: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<V>>> + Send + 'static,
    {
        self.origin = Some(Arc::new(move || origin().boxed()));
        self
    }

    pub fn has_origin(&self) -> bool {
        self.origin.is_some()
    }

    /// 查找前的配置检查
    fn ensure_ready(&self) -> Result<&OriginFn<V>> {
        if self.tiers.is_empty() {
            return Err(CacheError::NoTiers);
        }
        self.origin.as_ref().ok_or(CacheError::OriginNotSet)
    }

    fn lookup<'a>(&'a self, origin: &'a OriginFn<V>) -> Lookup<'a, V> {
        Lookup {
            cache: &self.name,
            tiers: &self.tiers,
            origin,
            empty_values: self.empty_values,
        }
    }

    /// 获取值
    ///
    /// 逐层查找，全部未命中时回源，并回填所有未命中的缓存层
    ///
    /// # 返回值
    ///
    /// 返回解析出的值。没有缓存层时返回 `CacheError::NoTiers`，未设置回源函数时返回
    /// `CacheError::OriginNotSet`；缓存层或回源函数的错误原样返回
    #[instrument(skip(self), level = "debug", fields(cache = %self.name))]
    pub async fn get(&self) -> Result<Option<V>> {
        let origin = self.ensure_ready()?;
        self.lookup(origin).run(None).await
    }

    /// 获取值，同时返回各缓存层的命中状态
    ///
    /// 回填写入不改变状态，状态只反映读取结果。状态表每次调用新建。
    #[instrument(skip(self), level = "debug", fields(cache = %self.name))]
    pub async fn get_with_status(&self) -> Result<(Option<V>, StatusMap)> {
        let origin = self.ensure_ready()?;
        let mut status = StatusMap::untouched(self.tiers.labels());
        let value = self.lookup(origin).run(Some(&mut status)).await?;
        Ok((value, status))
    }

    /// 获取值，合并同一请求标识的并发查找
    ///
    /// 同一 `key` 的并发调用只执行一次查找（以及最多一次回源），后到的调用方等待同一个结果
    ///
    /// # 参数
    ///
    /// * `key` - 调用方提供的请求标识
    #[instrument(skip(self), level = "debug", fields(cache = %self.name))]
    pub async fn get_coalesced(&self, key: &str) -> Result<Option<V>> {
        let origin = self.ensure_ready()?.clone();
        let name = self.name.clone();
        let tiers = self.tiers.clone();
        let empty_values = self.empty_values;

        self.single_flight
            .run(key, move || {
                async move {
                    Lookup {
                        cache: &name,
                        tiers: &tiers,
                        origin: &origin,
                        empty_values,
                    }
                    .run(None)
                    .await
                }
                .boxed()
            })
            .await
    }
}
