//! tiered-cache - 多层读穿透缓存库
//!
//! 按注册顺序从最快的缓存层查到最慢的缓存层，全部未命中时回源，
//! 并把结果回填到所有未命中的缓存层。
//!
//! ```no_run
//! use tiered_cache::backend::{FileTier, MemoryTier};
//! use tiered_cache::TieredCache;
//!
//! # async fn run() -> tiered_cache::error::Result<()> {
//! let mut cache = TieredCache::<Vec<u8>>::new();
//! cache
//!     .append_tier_labeled("memory", MemoryTier::new("report", 1000, None))?
//!     .append_tier_labeled("disk", FileTier::new("/tmp/report.bin"))?
//!     .set_origin(|| async { Ok(Some(b"fresh report".to_vec())) });
//!
//! let (value, status) = cache.get_with_status().await?;
//! println!("{:?} via {}", value, status);
//! # Ok(())
//! # }
//! ```

pub use tokio;

pub mod backend;
pub mod builder;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod status;
pub mod sync;
pub mod telemetry;
pub mod tier;
pub mod utils;
pub mod value;

// Re-export commonly used items
pub use builder::build_cache;
pub use client::{OriginFn, TieredCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use status::{StatusMap, TierStatus};
pub use tier::Tier;
pub use value::{BytesValue, CacheValue, EmptyValuePolicy};

/// tiered-cache 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
