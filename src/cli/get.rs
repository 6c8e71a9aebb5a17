//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了值解析命令的实现。

use crate::cli::{GetArgs, OriginArgs};
use crate::client::TieredCache;
use crate::config::Config;
use crate::error::CacheError;
use crate::metrics::get_metrics_string;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tokio::process::Command;

pub async fn execute(args: &GetArgs) -> Result<()> {
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let mut cache = crate::build_cache(&config).await?;
    set_origin(&mut cache, &args.origin);

    let (value, status) = cache.get_with_status().await?;

    if args.status {
        if args.json {
            let report = serde_json::json!({
                "cache": cache.name(),
                "found": value.is_some(),
                "value_len": value.as_ref().map(Vec::len),
                "tiers": status,
            });
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            eprintln!("Cache:  {}", cache.name());
            for (label, tier_status) in status.iter() {
                eprintln!("  {:<16} {}", label, tier_status);
            }
        }
    }

    if args.metrics {
        eprint!("{}", get_metrics_string());
    }

    match value {
        Some(bytes) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
            Ok(())
        }
        None => bail!("No tier holds a value and the origin returned nothing"),
    }
}

fn set_origin(cache: &mut TieredCache<Vec<u8>>, origin: &OriginArgs) {
    match (&origin.origin_file, &origin.origin_cmd) {
        (Some(path), _) => {
            let path: PathBuf = path.clone();
            cache.set_origin(move || {
                let path = path.clone();
                async move {
                    match tokio::fs::read(&path).await {
                        Ok(bytes) => Ok(Some(bytes)),
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                        Err(e) => Err(CacheError::IoError(e)),
                    }
                }
            });
        }
        (None, Some(command)) => {
            let command = command.clone();
            cache.set_origin(move || {
                let command = command.clone();
                async move { run_origin_command(&command).await }
            });
        }
        // 没有回源时查找会以 OriginNotSet 失败
        (None, None) => {}
    }
}

async fn run_origin_command(command: &str) -> crate::error::Result<Option<Vec<u8>>> {
    let output = Command::new("sh").arg("-c").arg(command).output().await?;
    if !output.status.success() {
        return Err(CacheError::Origin(format!(
            "Origin command exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(Some(output.stdout))
}
