//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存值的约束，以及空值的处理策略。

use crate::error::{CacheError, Result};
use serde::Deserialize;

/// 可缓存值
///
/// 回源函数、每一个缓存层和查找结果使用同一个值类型。
/// "不存在"只由 `Option::None` 表示，空值是否等同于不存在由 [`EmptyValuePolicy`] 决定。
pub trait CacheValue: Clone + Send + Sync + 'static {
    /// 值是否为空（例如零长度的字节序列）
    fn is_empty_value(&self) -> bool {
        false
    }
}

/// 可编码为字节的缓存值
///
/// 文件和Redis这类只保存原始字节的缓存层要求值实现该特征
pub trait BytesValue: CacheValue {
    /// 获取值的字节表示
    fn as_bytes(&self) -> &[u8];

    /// 从字节恢复值
    ///
    /// # 参数
    ///
    /// * `bytes` - 后端读出的原始字节
    ///
    /// # 返回值
    ///
    /// 返回解码后的值，字节无法表示该类型时返回 `CacheError::Decode`
    fn from_bytes(bytes: Vec<u8>) -> Result<Self>;
}

impl CacheValue for Vec<u8> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl BytesValue for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(bytes)
    }
}

impl CacheValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl BytesValue for String {
    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }

    fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes).map_err(|e| CacheError::Decode(e.to_string()))
    }
}

/// 空值处理策略
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmptyValuePolicy {
    /// 空值是有效的缓存值：命中即返回，回源得到的空值也会回填
    Cacheable,
    /// 空值视为不存在：缓存层返回空值算作未命中，回源得到的空值原样返回且不回填
    #[default]
    #[serde(alias = "absent")]
    TreatAsAbsent,
}

impl EmptyValuePolicy {
    /// 判断一个已取得的值是否算作"存在"
    pub fn is_present<V: CacheValue>(self, value: &V) -> bool {
        match self {
            EmptyValuePolicy::Cacheable => true,
            EmptyValuePolicy::TreatAsAbsent => !value.is_empty_value(),
        }
    }
}
