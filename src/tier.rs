//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存层的接口，每个缓存后端都需要实现它。

use crate::error::Result;
use crate::value::CacheValue;
use async_trait::async_trait;
use std::sync::Arc;

/// 缓存层特征
///
/// 一个缓存层绑定一份数据（例如一个Redis键或一个文件），只需提供读取和写入两个操作。
/// 数据不存在时 `fetch` 返回 `Ok(None)`，不能返回错误；错误只表示后端本身的失败。
#[async_trait]
pub trait Tier<V: CacheValue>: Send + Sync {
    /// 读取缓存值
    ///
    /// # 返回值
    ///
    /// 返回缓存值，如果不存在则返回None
    async fn fetch(&self) -> Result<Option<V>>;

    /// 写入缓存值
    ///
    /// # 参数
    ///
    /// * `value` - 需要写入的值
    ///
    /// # 返回值
    ///
    /// 返回操作结果
    async fn store(&self, value: &V) -> Result<()>;
}

#[async_trait]
impl<V, T> Tier<V> for Arc<T>
where
    V: CacheValue,
    T: Tier<V> + ?Sized,
{
    async fn fetch(&self) -> Result<Option<V>> {
        (**self).fetch().await
    }

    async fn store(&self, value: &V) -> Result<()> {
        (**self).store(value).await
    }
}
