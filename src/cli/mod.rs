//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了CLI命令行接口。

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tiered-cache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Log filter, overrides the default (RUST_LOG wins)")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "get", about = "Resolve a value through the configured tiers")]
    Get(GetArgs),

    #[command(name = "check", about = "Validate a configuration and list its tiers")]
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct OriginArgs {
    #[arg(
        long,
        conflicts_with = "origin_cmd",
        help = "Read the origin value from this file"
    )]
    pub origin_file: Option<PathBuf>,

    #[arg(long, help = "Run this shell command and use its stdout as the origin value")]
    pub origin_cmd: Option<String>,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    #[arg(short, long, help = "Path to the TOML configuration")]
    pub config: PathBuf,

    #[command(flatten)]
    pub origin: OriginArgs,

    #[arg(short, long, help = "Print the per-tier hit/miss status to stderr")]
    pub status: bool,

    #[arg(short, long, help = "Print the status in JSON format")]
    pub json: bool,

    #[arg(short, long, help = "Print request metrics to stderr after the lookup")]
    pub metrics: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[arg(short, long, help = "Path to the TOML configuration")]
    pub config: PathBuf,
}

mod check;
mod get;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::telemetry::init_tracing(cli.log.as_deref(), false);

    match &cli.command {
        Commands::Get(args) => get::execute(args).await,
        Commands::Check(args) => check::execute(args),
    }
}
