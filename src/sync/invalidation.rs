//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了缓存清理与预热状态查询。

use crate::backend::CacheStore;
use crate::domain::{MANAGED_PATTERNS, WARMUP_INDICATOR_KEYS};
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// 缓存整体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    WarmedUp,
    NotWarmed,
    Failed,
}

/// 缓存统计快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatistics {
    pub total_keys: usize,
    pub warmed_up: bool,
    pub status: CacheStatus,
}

impl CacheStatistics {
    fn failed() -> Self {
        Self {
            total_keys: 0,
            warmed_up: false,
            status: CacheStatus::Failed,
        }
    }
}

/// 全量清理报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClearReport {
    /// 每个模式删除的键数量
    pub removed: BTreeMap<String, usize>,
    /// 清理失败的模式及原因
    pub failures: BTreeMap<String, String>,
}

impl ClearReport {
    pub fn total_removed(&self) -> usize {
        self.removed.values().sum()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 缓存失效器
///
/// 按模式枚举并删除缓存键，并根据指示键判断缓存是否已预热
#[derive(Clone)]
pub struct CacheInvalidator {
    store: Arc<dyn CacheStore>,
}

impl CacheInvalidator {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// 清理所有受管理的键模式
    ///
    /// 单个模式失败不影响其他模式
    pub async fn clear_all(&self) -> ClearReport {
        let mut report = ClearReport::default();
        for pattern in MANAGED_PATTERNS {
            match self.clear_by_pattern(pattern).await {
                Ok(removed) => {
                    report.removed.insert(pattern.to_string(), removed);
                }
                Err(e) => {
                    warn!("Failed to clear pattern {}: {}", pattern, e);
                    report.failures.insert(pattern.to_string(), e.to_string());
                }
            }
        }
        info!(
            "Cache cleared: removed={}, failed_patterns={}",
            report.total_removed(),
            report.failures.len()
        );
        report
    }

    /// 删除匹配glob模式的所有键
    ///
    /// # 参数
    ///
    /// * `pattern` - Redis风格的glob模式，例如 `course:*`
    ///
    /// # 返回值
    ///
    /// 返回删除的键数量
    #[instrument(skip(self), level = "debug")]
    pub async fn clear_by_pattern(&self, pattern: &str) -> Result<usize> {
        let keys = self.store.keys(pattern).await?;
        if keys.is_empty() {
            debug!("No keys match pattern {}", pattern);
            return Ok(0);
        }
        let removed = self.store.delete_many(&keys).await?;
        debug!("Removed {} keys matching {}", removed, pattern);
        Ok(removed)
    }

    /// 检查核心领域是否已预热
    ///
    /// 存储出错时视为未预热
    pub async fn is_warmed_up(&self) -> bool {
        for key in WARMUP_INDICATOR_KEYS {
            match self.store.exists(key).await {
                Ok(true) => continue,
                Ok(false) => return false,
                Err(e) => {
                    warn!("Failed to check warmup indicator {}: {}", key, e);
                    return false;
                }
            }
        }
        true
    }

    /// 统计受管理的键数量与预热状态
    pub async fn statistics(&self) -> CacheStatistics {
        let mut total_keys = 0usize;
        for pattern in MANAGED_PATTERNS {
            match self.store.keys(pattern).await {
                Ok(keys) => total_keys += keys.len(),
                Err(e) => {
                    warn!("Failed to enumerate keys for {}: {}", pattern, e);
                    return CacheStatistics::failed();
                }
            }
        }

        let warmed_up = self.is_warmed_up().await;
        CacheStatistics {
            total_keys,
            warmed_up,
            status: if warmed_up {
                CacheStatus::WarmedUp
            } else {
                CacheStatus::NotWarmed
            },
        }
    }
}
