//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了测试的通用工具函数和模拟缓存层。

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tiered_cache::error::{CacheError, Result};
use tiered_cache::Tier;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn setup_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_span_events(FmtSpan::CLOSE)
            .with_env_filter(EnvFilter::new("debug"))
            .try_init()
            .ok();
    });
}

/// 记录所有缓存层调用顺序的日志，条目形如 "fetch:a"、"store:a"
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn journal_entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// 可记录调用的模拟缓存层
pub struct RecordingTier {
    name: String,
    value: Mutex<Option<Vec<u8>>>,
    journal: Journal,
    fail_fetch: bool,
    fail_store: bool,
    fetches: AtomicUsize,
    stores: Mutex<Vec<Vec<u8>>>,
}

impl RecordingTier {
    pub fn empty(name: &str, journal: &Journal) -> Arc<Self> {
        Arc::new(Self::build(name, None, journal, false, false))
    }

    pub fn holding(name: &str, value: &[u8], journal: &Journal) -> Arc<Self> {
        Arc::new(Self::build(name, Some(value.to_vec()), journal, false, false))
    }

    pub fn failing_store(name: &str, journal: &Journal) -> Arc<Self> {
        Arc::new(Self::build(name, None, journal, false, true))
    }

    pub fn failing_fetch(name: &str, journal: &Journal) -> Arc<Self> {
        Arc::new(Self::build(name, None, journal, true, false))
    }

    fn build(
        name: &str,
        value: Option<Vec<u8>>,
        journal: &Journal,
        fail_fetch: bool,
        fail_store: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            value: Mutex::new(value),
            journal: journal.clone(),
            fail_fetch,
            fail_store,
            fetches: AtomicUsize::new(0),
            stores: Mutex::new(Vec::new()),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// 所有写入过的值
    pub fn stored(&self) -> Vec<Vec<u8>> {
        self.stores.lock().unwrap().clone()
    }

    pub fn current(&self) -> Option<Vec<u8>> {
        self.value.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tier<Vec<u8>> for RecordingTier {
    async fn fetch(&self) -> Result<Option<Vec<u8>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.journal
            .lock()
            .unwrap()
            .push(format!("fetch:{}", self.name));
        if self.fail_fetch {
            return Err(CacheError::BackendError(format!("{} fetch failed", self.name)));
        }
        Ok(self.value.lock().unwrap().clone())
    }

    async fn store(&self, value: &Vec<u8>) -> Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("store:{}", self.name));
        if self.fail_store {
            return Err(CacheError::BackendError(format!("{} store failed", self.name)));
        }
        self.stores.lock().unwrap().push(value.clone());
        *self.value.lock().unwrap() = Some(value.clone());
        Ok(())
    }
}

/// 回源调用计数器
#[derive(Clone, Default)]
pub struct OriginCounter(Arc<AtomicUsize>);

impl OriginCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// 检查Redis是否可用
///
/// 优先使用环境变量 REDIS_URL，否则连接本地无密码实例
pub async fn is_redis_available() -> bool {
    let url = redis_url();
    let client = match redis::Client::open(url.as_str()) {
        Ok(c) => c,
        Err(_) => return false,
    };
    let conn = tokio::time::timeout(
        std::time::Duration::from_millis(500),
        client.get_multiplexed_async_connection(),
    )
    .await;
    let mut conn = match conn {
        Ok(Ok(conn)) => conn,
        _ => return false,
    };
    redis::cmd("PING")
        .query_async::<String>(&mut conn)
        .await
        .is_ok()
}

pub fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

/// 生成唯一的键，避免测试之间互相影响
pub fn unique_key(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("tiered_cache:test:{}:{}", prefix, nanos)
}
