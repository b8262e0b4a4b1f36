//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了CLI命令行接口。

use crate::config::{AppConfig, StoreKind};
use crate::manager::CacheManager;
use crate::provider::{Fixture, FixtureProviders, Providers, StaticConfigProvider};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "campus-cache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Path to the TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "info", help = "Log filter when RUST_LOG is unset")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "warmup", about = "Warm the cache from a data fixture")]
    Warmup(WarmupArgs),

    #[command(name = "clear", about = "Clear managed cache keys")]
    Clear(ClearArgs),

    #[command(name = "status", about = "Show cache warm status and key counts")]
    Status(StatusArgs),

    #[command(name = "stats", about = "Derive dashboard statistics")]
    Stats(StatsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarmupSubset {
    All,
    Dashboard,
    Basic,
}

#[derive(Parser, Debug)]
pub struct WarmupArgs {
    #[arg(short, long, value_enum, default_value = "all", help = "Domains to warm")]
    pub subset: WarmupSubset,

    #[arg(short, long, help = "JSON fixture serving the domain data")]
    pub fixture: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ClearArgs {
    #[arg(short, long, help = "Glob pattern to clear, e.g. 'course:*'")]
    pub pattern: Option<String>,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[arg(short, long, help = "Output in JSON format")]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    #[arg(short, long, help = "JSON fixture serving the domain data")]
    pub fixture: Option<PathBuf>,

    #[arg(short, long, help = "Output in JSON format")]
    pub json: bool,
}

mod clear;
mod stats;
mod status;
mod warmup;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::telemetry::init_tracing("campus-cache", &cli.log_level);

    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Warmup(args) => warmup::execute(config, args).await,
        Commands::Clear(args) => clear::execute(config, args).await,
        Commands::Status(args) => status::execute(config, args).await,
        Commands::Stats(args) => stats::execute(config, args).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

/// 以夹具数据构建缓存管理器，未指定夹具时所有领域为空
pub(crate) async fn build_manager(
    config: AppConfig,
    fixture: Option<&Path>,
) -> Result<CacheManager> {
    let fixture = match fixture {
        Some(path) => Fixture::from_file(path)
            .with_context(|| format!("Failed to load fixture from {}", path.display()))?,
        None => Fixture::default(),
    };
    let providers = Providers::from_fixture(
        Arc::new(FixtureProviders::new(fixture)),
        Arc::new(StaticConfigProvider::new(config.system.clone())),
    );
    CacheManager::from_config(config, providers)
        .await
        .context("Failed to initialize cache manager")
}

/// 非Redis存储只存在于当前进程内，跨进程的查看与清理看不到任何键
pub(crate) fn process_local_store_notice(config: &AppConfig) -> Option<String> {
    match config.store.kind {
        StoreKind::Redis => None,
        kind => Some(format!(
            "store.kind = {:?} is local to this process; configure a redis store to inspect or clear a shared cache",
            kind
        )),
    }
}

pub(crate) fn warn_if_process_local(config: &AppConfig) {
    if let Some(notice) = process_local_store_notice(config) {
        warn!("{}", notice);
        eprintln!("⚠️  {}", notice);
    }
}
