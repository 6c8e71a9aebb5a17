//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了分层缓存客户端和回源函数类型。

mod lookup;
pub mod tiered;

use crate::error::Result;
use futures::future::BoxFuture;
use std::sync::Arc;

pub use tiered::TieredCache;

/// 回源函数返回的future
pub type OriginFuture<V> = BoxFuture<'static, Result<Option<V>>>;

/// 回源函数
///
/// 所有缓存层都未命中时调用，返回权威数据源中的值
pub type OriginFn<V> = Arc<dyn Fn() -> OriginFuture<V> + Send + Sync>;
