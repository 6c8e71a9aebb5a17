//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了每次查找中各缓存层的命中状态记录。

use serde::Serialize;
use std::fmt;

/// 缓存层状态
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TierStatus {
    /// 本次查找未探测到该层
    Untouched,
    /// 命中
    Hit,
    /// 未命中
    Miss,
}

impl fmt::Display for TierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TierStatus::Untouched => "untouched",
            TierStatus::Hit => "hit",
            TierStatus::Miss => "miss",
        };
        f.write_str(s)
    }
}

/// 单次查找的状态表
///
/// 按缓存层注册顺序保存 (标签, 状态)。每次查找都会新建一个状态表，缓存实例本身不保存它。
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct StatusMap {
    entries: Vec<TierEntry>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
struct TierEntry {
    label: String,
    status: TierStatus,
}

impl StatusMap {
    /// 创建状态表，所有缓存层初始为 `Untouched`
    pub fn untouched<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            entries: labels
                .into_iter()
                .map(|label| TierEntry {
                    label: label.to_string(),
                    status: TierStatus::Untouched,
                })
                .collect(),
        }
    }

    /// 记录某一层的探测结果
    pub(crate) fn record(&mut self, position: usize, status: TierStatus) {
        if let Some(entry) = self.entries.get_mut(position) {
            entry.status = status;
        }
    }

    /// 根据标签查询状态
    pub fn get(&self, label: &str) -> Option<TierStatus> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TierStatus)> {
        self.entries.iter().map(|e| (e.label.as_str(), e.status))
    }

    /// 第一个命中的缓存层标签
    pub fn first_hit(&self) -> Option<&str> {
        self.iter()
            .find(|(_, s)| *s == TierStatus::Hit)
            .map(|(l, _)| l)
    }

    /// 已探测（命中或未命中）的缓存层数量
    pub fn probed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status != TierStatus::Untouched)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for StatusMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, status)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", label, status)?;
        }
        Ok(())
    }
}
