//! campus-cache - 校园管理后台的缓存预热与仪表板统计
//!
//! 按领域并发预热缓存，支持按模式失效与预热状态检查，
//! 缓存后端缺失时降级为空操作存储；并基于启发式规则推导仪表板统计。

#![doc(html_root_url = "https://docs.rs/campus-cache/0.1.0")]

pub use serde;
pub use serde::{Deserialize, Serialize};
pub use serde_json;
pub use tokio;

pub mod backend;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manager;
pub mod provider;
pub mod serialization;
pub mod snapshot;
pub mod stats;
pub mod sync;
pub mod telemetry;
pub mod utils;

// Re-export commonly used items
pub use backend::{CacheStore, MemoryStore, NoopStore, RedisStore};
pub use config::AppConfig;
pub use domain::Domain;
pub use error::{CacheError, Result};
pub use manager::CacheManager;
pub use provider::Providers;
pub use stats::{DashboardStats, StatisticsDeriver};
pub use sync::invalidation::{CacheInvalidator, CacheStatistics, CacheStatus, ClearReport};
pub use sync::warmup::{CacheWarmer, DomainOutcome, WarmupReport, WarmupStatus};

/// campus-cache 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
