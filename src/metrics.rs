//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了分层缓存的指标收集功能。

use dashmap::DashMap;
use lazy_static::lazy_static;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{span, Level};

/// 请求计数的键：(缓存名称, 缓存层标签, 操作, 结果)
pub type RequestKey = (String, String, &'static str, &'static str);

/// 耗时统计的键：(缓存名称, 缓存层标签, 操作)
pub type DurationKey = (String, String, &'static str);

/// 指标收集器
///
/// 用于收集每个缓存实例、每个缓存层的请求次数和耗时
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    /// 请求总数统计
    pub requests_total: Arc<DashMap<RequestKey, u64>>,
    /// 操作耗时
    /// value: (total_duration_secs, count)
    pub operation_duration: Arc<DashMap<DurationKey, (f64, u64)>>,
}

lazy_static! {
    /// 全局指标实例
    pub static ref GLOBAL_METRICS: Metrics = Metrics::default();
}

impl Metrics {
    /// 记录请求指标
    ///
    /// # 参数
    ///
    /// * `cache` - 缓存实例名称
    /// * `tier` - 缓存层标签，回源使用 "origin"
    /// * `op` - 操作类型（fetch/store/load）
    /// * `result` - 操作结果（hit/miss/ok/empty/error）
    pub fn record_request(&self, cache: &str, tier: &str, op: &'static str, result: &'static str) {
        let span = span!(Level::TRACE, "cache_request", cache, tier, op, result);
        let _enter = span.enter();
        let key = (cache.to_string(), tier.to_string(), op, result);
        *self.requests_total.entry(key).or_insert(0) += 1;
    }

    /// 记录操作耗时
    pub fn record_duration(&self, cache: &str, tier: &str, op: &'static str, duration_secs: f64) {
        let key = (cache.to_string(), tier.to_string(), op);
        let mut entry = self.operation_duration.entry(key).or_insert((0.0, 0));
        entry.0 += duration_secs;
        entry.1 += 1;
    }

    /// 查询某个计数
    pub fn request_count(&self, cache: &str, tier: &str, op: &'static str, result: &'static str) -> u64 {
        let key = (cache.to_string(), tier.to_string(), op, result);
        self.requests_total.get(&key).map(|v| *v).unwrap_or(0)
    }

    /// 将指标格式化为Prometheus文本格式
    pub fn render(&self) -> String {
        let mut output = String::new();

        let mut requests: Vec<(RequestKey, u64)> = self
            .requests_total
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        requests.sort();
        for ((cache, tier, op, result), v) in requests {
            let _ = writeln!(
                output,
                "tiered_cache_requests_total{{cache=\"{}\", tier=\"{}\", operation=\"{}\", result=\"{}\"}} {}",
                escape_label(&cache),
                escape_label(&tier),
                op,
                result,
                v
            );
        }

        let mut durations: Vec<(DurationKey, (f64, u64))> = self
            .operation_duration
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        durations.sort_by(|a, b| a.0.cmp(&b.0));
        for ((cache, tier, op), (total, count)) in durations {
            let cache = escape_label(&cache);
            let tier = escape_label(&tier);
            let _ = writeln!(
                output,
                "tiered_cache_operation_duration_seconds_sum{{cache=\"{}\", tier=\"{}\", operation=\"{}\"}} {}",
                cache, tier, op, total
            );
            let _ = writeln!(
                output,
                "tiered_cache_operation_duration_seconds_count{{cache=\"{}\", tier=\"{}\", operation=\"{}\"}} {}",
                cache, tier, op, count
            );
        }
        output
    }
}

/// 转义Prometheus标签值中的反斜杠、双引号和换行
fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// 获取指标字符串
///
/// 将全局指标格式化为Prometheus文本格式，用于监控系统采集
///
/// # 返回值
///
/// 返回包含所有指标的字符串
pub fn get_metrics_string() -> String {
    GLOBAL_METRICS.render()
}
