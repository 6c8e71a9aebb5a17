//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存层的具体后端，包括内存、文件和Redis缓存层。

pub mod file;
pub mod memory;
pub mod redis;
pub mod redis_provider;

pub use file::FileTier;
pub use memory::{MemoryStore, MemoryTier};
pub use self::redis::RedisTier;
