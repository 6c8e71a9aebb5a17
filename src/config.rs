//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了分层缓存的配置结构和解析逻辑。

use crate::error::{CacheError, Result};
use crate::value::EmptyValuePolicy;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: u32 = 1;

/// 缓存过期时间上限（秒）
const MAX_TTL_SECS: u64 = 86400 * 30;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub config_version: Option<u32>,
    #[serde(default)]
    pub cache: CacheConfig,
    /// 按探测顺序排列的缓存层
    #[serde(default)]
    pub tiers: Vec<TierConfig>,
}

/// 缓存实例配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CacheConfig {
    /// 缓存名称，用于日志和指标
    pub name: String,
    /// 空值处理策略
    pub empty_values: EmptyValuePolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: crate::client::tiered::DEFAULT_CACHE_NAME.to_string(),
            empty_values: EmptyValuePolicy::default(),
        }
    }
}

/// 缓存层配置
#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TierConfig {
    /// 内存缓存层
    Memory(MemoryTierConfig),
    /// 文件缓存层
    File(FileTierConfig),
    /// Redis缓存层
    Redis(RedisTierConfig),
}

impl TierConfig {
    /// 显式配置的标签
    pub fn label(&self) -> Option<&str> {
        match self {
            TierConfig::Memory(c) => c.label.as_deref(),
            TierConfig::File(c) => c.label.as_deref(),
            TierConfig::Redis(c) => c.label.as_deref(),
        }
    }

    /// 缓存层类型名称
    pub fn kind(&self) -> &'static str {
        match self {
            TierConfig::Memory(_) => "memory",
            TierConfig::File(_) => "file",
            TierConfig::Redis(_) => "redis",
        }
    }
}

/// 内存缓存层配置
#[derive(Deserialize, Clone, Debug)]
pub struct MemoryTierConfig {
    /// 缓存层标签，缺省时自动分配
    #[serde(default)]
    pub label: Option<String>,
    /// 缓存键
    pub key: String,
    /// 最大条目数
    #[serde(default = "default_memory_capacity")]
    pub max_capacity: u64,
    /// 过期时间（秒）
    #[serde(default = "default_memory_ttl")]
    pub ttl_secs: u64,
}

fn default_memory_capacity() -> u64 {
    10000
}

fn default_memory_ttl() -> u64 {
    300
}

/// 文件缓存层配置
#[derive(Deserialize, Clone, Debug)]
pub struct FileTierConfig {
    /// 缓存层标签，缺省时自动分配
    #[serde(default)]
    pub label: Option<String>,
    /// 缓存文件路径
    pub path: PathBuf,
}

/// Redis缓存层配置
#[derive(Deserialize, Clone, Debug)]
pub struct RedisTierConfig {
    /// 缓存层标签，缺省时自动分配
    #[serde(default)]
    pub label: Option<String>,
    /// 连接字符串
    #[serde(default = "default_connection_string")]
    pub connection_string: SecretString,
    /// 缓存键
    pub key: String,
    /// 过期时间（秒）
    #[serde(default = "default_redis_ttl")]
    pub ttl_secs: u64,
    /// 读取命中时是否刷新过期时间
    #[serde(default)]
    pub refresh_ttl_on_read: bool,
    /// 连接超时时间（毫秒）
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_ms: u64,
    /// 命令执行超时时间（毫秒）
    #[serde(default = "default_command_timeout")]
    pub command_timeout_ms: u64,
}

fn default_connection_string() -> SecretString {
    SecretString::new("redis://127.0.0.1:6379".to_string().into())
}

fn default_redis_ttl() -> u64 {
    3600
}

fn default_connection_timeout() -> u64 {
    5000
}

fn default_command_timeout() -> u64 {
    3000
}

impl RedisTierConfig {
    /// 使用默认连接参数创建配置
    pub fn new(key: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            label: None,
            connection_string: default_connection_string(),
            key: key.into(),
            ttl_secs,
            refresh_ttl_on_read: false,
            connection_timeout_ms: default_connection_timeout(),
            command_timeout_ms: default_command_timeout(),
        }
    }
}

impl Config {
    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CacheError::Configuration(e.to_string()))
    }

    /// 从TOML文件加载配置
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CacheError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// 验证配置
    ///
    /// 检查配置的有效性，确保所有必需的字段都已设置，并且值在合理范围内
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(version) = self.config_version {
            if version > CONFIG_VERSION {
                return Err(format!(
                    "Configuration version {} is not supported. Current version is {}.",
                    version, CONFIG_VERSION
                ));
            }
        }

        if self.cache.name.is_empty() {
            return Err("Cache name cannot be empty".to_string());
        }

        if self.tiers.is_empty() {
            return Err("At least one tier must be configured".to_string());
        }

        let mut labels = HashSet::new();
        for (position, tier) in self.tiers.iter().enumerate() {
            if let Some(label) = tier.label() {
                if label.is_empty() {
                    return Err(format!("Tier #{} label cannot be empty", position));
                }
                if !labels.insert(label) {
                    return Err(format!("Duplicate tier label '{}'", label));
                }
            }

            match tier {
                TierConfig::Memory(c) => {
                    if c.key.is_empty() {
                        return Err(format!("Memory tier #{} key cannot be empty", position));
                    }
                    if c.max_capacity == 0 {
                        return Err(format!(
                            "Memory tier #{} max_capacity cannot be zero",
                            position
                        ));
                    }
                    validate_ttl(position, c.ttl_secs)?;
                }
                TierConfig::File(c) => {
                    if c.path.as_os_str().is_empty() {
                        return Err(format!("File tier #{} path cannot be empty", position));
                    }
                }
                TierConfig::Redis(c) => {
                    if c.key.is_empty() {
                        return Err(format!("Redis tier #{} key cannot be empty", position));
                    }
                    validate_ttl(position, c.ttl_secs)?;
                    if !(100..=30000).contains(&c.connection_timeout_ms) {
                        return Err(format!(
                            "Redis tier #{} connection_timeout_ms must be between 100 and 30000 ms",
                            position
                        ));
                    }
                    if !(100..=60000).contains(&c.command_timeout_ms) {
                        return Err(format!(
                            "Redis tier #{} command_timeout_ms must be between 100 and 60000 ms",
                            position
                        ));
                    }
                }
            }
        }

        // 自动标签等于追加时的位置，不能与之前的显式标签冲突
        let mut assigned = HashSet::new();
        for (position, tier) in self.tiers.iter().enumerate() {
            let label = tier
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| position.to_string());
            if !assigned.insert(label.clone()) {
                return Err(format!(
                    "Tier #{} automatic label '{}' collides with an explicit label",
                    position, label
                ));
            }
        }

        Ok(())
    }
}

fn validate_ttl(position: usize, ttl_secs: u64) -> std::result::Result<(), String> {
    if ttl_secs == 0 {
        return Err(format!("Tier #{} ttl_secs cannot be zero", position));
    }
    if ttl_secs > MAX_TTL_SECS {
        return Err(format!(
            "Tier #{} ttl_secs cannot exceed 30 days (2592000 seconds)",
            position
        ));
    }
    Ok(())
}
