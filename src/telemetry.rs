//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了日志和链路追踪的初始化。

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// 默认日志过滤规则
pub const DEFAULT_FILTER: &str = "tiered_cache=info";

/// 初始化 tracing subscriber
///
/// 此函数应该在应用程序启动时调用一次。优先使用 `RUST_LOG` 环境变量，
/// 未设置时使用传入的过滤规则。重复调用不会覆盖已经安装的全局 subscriber。
///
/// # 参数
///
/// * `filter` - 日志过滤规则，例如 "tiered_cache=debug"
/// * `log_spans` - 是否在 span 关闭时输出耗时
pub fn init_tracing(filter: Option<&str>, log_spans: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER)));

    let span_events = if log_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_span_events(span_events)
        .with_writer(std::io::stderr)
        .try_init();
}
