//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了分层缓存的错误类型和处理机制。

use std::sync::Arc;
use thiserror::Error;

/// 分层缓存错误类型枚举
///
/// 前三个变体是查找开始前的配置错误，其余变体原样透传后端或回源的失败。
#[derive(Error, Debug)]
pub enum CacheError {
    /// 未设置回源函数
    #[error("Origin function is not set")]
    OriginNotSet,

    /// 没有注册任何缓存层
    #[error("At least one cache tier must be set")]
    NoTiers,

    /// 缓存层标签重复
    #[error("Cache tier label already exists: {0}")]
    DuplicateLabel(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Redis错误
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    /// IO错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 值解码失败
    #[error("Decode error: {0}")]
    Decode(String),

    /// 后端错误
    #[error("Backend error: {0}")]
    BackendError(String),

    /// 回源函数返回的错误
    #[error("Origin error: {0}")]
    Origin(String),

    /// 超时错误
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// 合并请求中共享的错误
    ///
    /// 多个调用方等待同一个回源请求时，除最后一个持有者外，其余调用方收到该变体
    #[error("{0}")]
    Shared(Arc<CacheError>),
}

impl CacheError {
    /// 是否为查找前的配置类错误
    pub fn is_configuration(&self) -> bool {
        match self {
            CacheError::OriginNotSet
            | CacheError::NoTiers
            | CacheError::DuplicateLabel(_)
            | CacheError::Configuration(_) => true,
            CacheError::Shared(inner) => inner.is_configuration(),
            _ => false,
        }
    }

    /// 展开共享错误，返回最初产生的错误引用
    pub fn root(&self) -> &CacheError {
        match self {
            CacheError::Shared(inner) => inner.root(),
            other => other,
        }
    }
}

/// 缓存操作结果类型别名
///
/// 简化错误处理，所有缓存操作都返回此类型
pub type Result<T> = std::result::Result<T, CacheError>;
