//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了配置检查命令的实现。

use crate::cli::CheckArgs;
use crate::config::{Config, TierConfig};
use anyhow::{anyhow, Context, Result};
use secrecy::ExposeSecret;

pub fn execute(args: &CheckArgs) -> Result<()> {
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    println!("=== Tiered Cache '{}' ===\n", config.cache.name);
    println!("Empty values: {:?}", config.cache.empty_values);
    println!("Tiers (probe order):");

    for (position, tier) in config.tiers.iter().enumerate() {
        let label = tier
            .label()
            .map(str::to_string)
            .unwrap_or_else(|| position.to_string());
        println!("  {}. [{}] {} -> {}", position, label, tier.kind(), describe(tier));
    }

    Ok(())
}

fn describe(tier: &TierConfig) -> String {
    match tier {
        TierConfig::Memory(c) => format!(
            "key={}, max_capacity={}, ttl={}s",
            c.key, c.max_capacity, c.ttl_secs
        ),
        TierConfig::File(c) => format!("path={}", c.path.display()),
        TierConfig::Redis(c) => format!(
            "{} key={}, ttl={}s, refresh_ttl_on_read={}",
            crate::utils::redaction::redact_connection_string(c.connection_string.expose_secret()),
            c.key,
            c.ttl_secs,
            c.refresh_ttl_on_read
        ),
    }
}
