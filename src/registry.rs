//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存层注册表，按插入顺序保存带标签的缓存层。

use crate::error::{CacheError, Result};
use crate::tier::Tier;
use crate::value::CacheValue;
use std::sync::Arc;
use tracing::debug;

/// 共享的缓存层句柄
pub type SharedTier<V> = Arc<dyn Tier<V>>;

/// 缓存层注册表
///
/// 迭代顺序即插入顺序，也就是查找时的探测顺序。标签在同一个注册表内唯一。
pub struct TierRegistry<V: CacheValue> {
    entries: Vec<(String, SharedTier<V>)>,
}

impl<V: CacheValue> Default for TierRegistry<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V: CacheValue> Clone for TierRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<V: CacheValue> std::fmt::Debug for TierRegistry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TierRegistry")
            .field("labels", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}

impl<V: CacheValue> TierRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以自动标签追加缓存层
    ///
    /// 自动标签为追加时注册表大小的十进制字符串，因此可能与之前显式使用的数字标签冲突
    ///
    /// # 返回值
    ///
    /// 返回分配的标签，标签已存在时返回 `CacheError::DuplicateLabel`
    pub fn append(&mut self, tier: SharedTier<V>) -> Result<String> {
        let label = self.entries.len().to_string();
        self.append_labeled(label.clone(), tier)?;
        Ok(label)
    }

    /// 以指定标签追加缓存层
    ///
    /// # 参数
    ///
    /// * `label` - 缓存层标签
    /// * `tier` - 缓存层
    pub fn append_labeled(&mut self, label: impl Into<String>, tier: SharedTier<V>) -> Result<()> {
        let label = label.into();
        if self.contains(&label) {
            return Err(CacheError::DuplicateLabel(label));
        }
        debug!("Tier registered: label={}, position={}", label, self.entries.len());
        self.entries.push((label, tier));
        Ok(())
    }

    /// 根据标签获取缓存层
    pub fn get(&self, label: &str) -> Option<&SharedTier<V>> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, tier)| tier)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    /// 按探测顺序遍历 (标签, 缓存层)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SharedTier<V>)> {
        self.entries.iter().map(|(l, t)| (l.as_str(), t))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
