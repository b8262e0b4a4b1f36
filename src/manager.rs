//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存管理器，组合存储、预热器、失效器和统计推导器。

use crate::backend::{build_store_with_fallback, CacheStore};
use crate::config::{AppConfig, TtlConfig};
use crate::domain::{keys, BASIC_STATS_PATTERN, DASHBOARD_PATTERN};
use crate::error::{CacheError, Result};
use crate::provider::Providers;
use crate::serialization::{JsonSerializer, Serializer};
use crate::stats::{DashboardStats, StatisticsDeriver};
use crate::sync::invalidation::{CacheInvalidator, CacheStatistics};
use crate::sync::warmup::{CacheWarmer, WarmupReport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// 缓存管理器
///
/// 应用层的统一入口。存储策略在构造时根据配置确定，
/// 之后所有组件共享同一个存储实例。
#[derive(Clone)]
pub struct CacheManager {
    config: AppConfig,
    store: Arc<dyn CacheStore>,
    warmer: CacheWarmer,
    invalidator: CacheInvalidator,
    deriver: StatisticsDeriver,
    serializer: JsonSerializer,
}

impl CacheManager {
    /// 使用给定存储创建缓存管理器
    pub fn new(config: AppConfig, store: Arc<dyn CacheStore>, providers: Providers) -> Self {
        let warmer = CacheWarmer::new(store.clone(), providers.clone(), &config);
        let invalidator = CacheInvalidator::new(store.clone());
        let deriver = StatisticsDeriver::new(providers, config.heuristics.clone());
        let serializer = JsonSerializer::for_store(&config.store);
        Self {
            config,
            store,
            warmer,
            invalidator,
            deriver,
            serializer,
        }
    }

    /// 根据配置初始化缓存管理器
    ///
    /// 缓存后端不可用时降级为空操作存储，应用仍可正常运行
    ///
    /// # 参数
    ///
    /// * `config` - 应用配置
    /// * `providers` - 领域数据提供者
    ///
    /// # 返回值
    ///
    /// 配置校验失败时返回错误
    #[instrument(skip_all, level = "info", fields(store = ?config.store.kind))]
    pub async fn from_config(config: AppConfig, providers: Providers) -> Result<Self> {
        config.validate().map_err(CacheError::Config)?;
        let store = build_store_with_fallback(&config.store).await;
        info!("CacheManager initialized with {} store", store.name());
        Ok(Self::new(config, store, providers))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn warmer(&self) -> &CacheWarmer {
        &self.warmer
    }

    pub fn invalidator(&self) -> &CacheInvalidator {
        &self.invalidator
    }

    pub fn deriver(&self) -> &StatisticsDeriver {
        &self.deriver
    }

    /// 应用启动时的预热
    ///
    /// 配置关闭预热时返回 `Ok(None)`；配置了截止时间时超时返回错误
    pub async fn startup(&self) -> Result<Option<WarmupReport>> {
        if !self.config.warmup.warm_on_start {
            info!("Warmup on start is disabled, skipping");
            return Ok(None);
        }
        let report = match self.config.warmup_deadline() {
            Some(deadline) => self.warm_all_within(deadline).await?,
            None => self.warmer.warm_all().await?,
        };
        Ok(Some(report))
    }

    /// 在截止时间内完成全量预热
    ///
    /// 超时后已派发的领域任务仍会在后台完成写入
    pub async fn warm_all_within(&self, deadline: Duration) -> Result<WarmupReport> {
        match tokio::time::timeout(deadline, self.warmer.warm_all()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Cache warmup timed out after {} ms",
                    deadline.as_millis()
                );
                Err(CacheError::Timeout(format!(
                    "warmup did not finish within {} ms",
                    deadline.as_millis()
                )))
            }
        }
    }

    /// 刷新仪表板缓存：清理 `dashboard:*` 后重新预热仪表板子集
    pub async fn refresh_dashboard(&self) -> Result<WarmupReport> {
        let removed = self.invalidator.clear_by_pattern(DASHBOARD_PATTERN).await?;
        debug!("Dashboard refresh removed {} keys", removed);
        self.warmer.warm_dashboard_subset().await
    }

    /// 刷新基础统计缓存：清理 `stats:*` 后重新预热基础统计子集
    pub async fn refresh_basic_stats(&self) -> Result<WarmupReport> {
        let removed = self
            .invalidator
            .clear_by_pattern(BASIC_STATS_PATTERN)
            .await?;
        debug!("Basic statistics refresh removed {} keys", removed);
        self.warmer.warm_basic_stats_subset().await
    }

    /// 记录并返回缓存统计
    pub async fn log_statistics(&self) -> CacheStatistics {
        let stats = self.invalidator.statistics().await;
        info!(
            "Cache statistics: total_keys={}, warmed_up={}, status={:?}",
            stats.total_keys, stats.warmed_up, stats.status
        );
        stats
    }

    /// 获取仪表板统计，优先读取缓存
    ///
    /// 缓存未命中或损坏时重新推导并写回，缓存读写失败只记录日志
    pub async fn dashboard_stats_cached(&self) -> DashboardStats {
        match self.store.get(keys::DASHBOARD_STATS).await {
            Ok(Some(bytes)) => match self.serializer.deserialize::<DashboardStats>(&bytes) {
                Ok(stats) => {
                    debug!("Dashboard statistics served from cache");
                    return stats;
                }
                Err(e) => warn!("Discarding unreadable dashboard cache entry: {}", e),
            },
            Ok(None) => debug!("Dashboard statistics cache miss"),
            Err(e) => warn!("Failed to read dashboard cache: {}", e),
        }

        let stats = self.deriver.derive().await;
        let ttl = TtlConfig::minutes(self.config.ttl.dashboard_stats);
        let written = match self.serializer.serialize(&stats) {
            Ok(bytes) => self.store.set(keys::DASHBOARD_STATS, bytes, ttl).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            warn!("Failed to cache dashboard statistics: {}", e);
        }
        stats
    }
}
