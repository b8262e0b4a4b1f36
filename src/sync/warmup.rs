//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了按领域并发的缓存预热。

use crate::backend::CacheStore;
use crate::config::{AppConfig, TtlConfig};
use crate::domain::{keys, Domain};
use crate::error::{CacheError, Result};
use crate::provider::Providers;
use crate::serialization::{JsonSerializer, Serializer};
use chrono::{DateTime, Local};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// 单个领域的预热状态
#[derive(Debug, Clone, PartialEq)]
pub enum WarmupStatus {
    Pending,
    InProgress,
    Completed { entries: usize },
    Failed { error: String },
}

/// 单个领域在一次预热中的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DomainOutcome {
    Completed { entries: usize },
    Failed { error: String },
}

impl DomainOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DomainOutcome::Completed { .. })
    }
}

/// 一次预热运行的报告
#[derive(Debug, Clone, Serialize)]
pub struct WarmupReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub duration: Duration,
    pub outcomes: BTreeMap<Domain, DomainOutcome>,
}

impl WarmupReport {
    /// 所有领域均已完成
    pub fn is_success(&self) -> bool {
        self.outcomes.values().all(DomainOutcome::is_completed)
    }

    pub fn failed_domains(&self) -> Vec<Domain> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_completed())
            .map(|(domain, _)| *domain)
            .collect()
    }

    /// 本次写入的缓存项总数
    pub fn total_entries(&self) -> usize {
        self.outcomes
            .values()
            .map(|outcome| match outcome {
                DomainOutcome::Completed { entries } => *entries,
                DomainOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

/// 缓存预热器
///
/// 每个领域在独立任务中获取快照并写入缓存，领域之间互不阻塞。
/// 克隆开销很小，所有状态都通过 `Arc` 共享。
#[derive(Clone)]
pub struct CacheWarmer {
    store: Arc<dyn CacheStore>,
    providers: Providers,
    ttl: TtlConfig,
    dictionary_types: Vec<String>,
    dashboard_domains: Vec<Domain>,
    basic_stats_domains: Vec<Domain>,
    serializer: JsonSerializer,
    warmup_status: Arc<RwLock<HashMap<Domain, WarmupStatus>>>,
}

impl CacheWarmer {
    /// 创建新的缓存预热器
    ///
    /// # 参数
    ///
    /// * `store` - 缓存存储
    /// * `providers` - 领域数据提供者
    /// * `config` - 应用配置，使用其中的TTL与预热子集
    pub fn new(store: Arc<dyn CacheStore>, providers: Providers, config: &AppConfig) -> Self {
        Self {
            store,
            providers,
            ttl: config.ttl.clone(),
            dictionary_types: config.warmup.dictionary_types.clone(),
            dashboard_domains: config.warmup.dashboard_domains.clone(),
            basic_stats_domains: config.warmup.basic_stats_domains.clone(),
            serializer: JsonSerializer::for_store(&config.store),
            warmup_status: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 预热全部领域
    ///
    /// # 返回值
    ///
    /// 领域失败体现在报告中；只有任务被运行时取消时返回错误
    pub async fn warm_all(&self) -> Result<WarmupReport> {
        info!("Starting full cache warmup");
        self.warm_domains(&Domain::ALL).await
    }

    /// 预热仪表板相关的领域子集
    pub async fn warm_dashboard_subset(&self) -> Result<WarmupReport> {
        info!("Starting dashboard cache warmup: {:?}", self.dashboard_domains);
        self.warm_domains(&self.dashboard_domains).await
    }

    /// 预热基础统计相关的领域子集
    pub async fn warm_basic_stats_subset(&self) -> Result<WarmupReport> {
        info!(
            "Starting basic statistics cache warmup: {:?}",
            self.basic_stats_domains
        );
        self.warm_domains(&self.basic_stats_domains).await
    }

    /// 并发预热指定领域并等待全部完成
    ///
    /// 重复的领域只预热一次
    pub async fn warm_domains(&self, domains: &[Domain]) -> Result<WarmupReport> {
        let started_at = Local::now();
        let start = Instant::now();

        let unique: BTreeSet<Domain> = domains.iter().copied().collect();
        let (names, handles): (Vec<_>, Vec<_>) = unique
            .into_iter()
            .map(|domain| {
                let warmer = self.clone();
                let handle = tokio::spawn(async move { warmer.warm_domain(domain).await });
                (domain, handle)
            })
            .unzip();

        let joined = join_all(handles).await;

        let mut outcomes = BTreeMap::new();
        for (domain, result) in names.into_iter().zip(joined) {
            let outcome = match result {
                Ok(Ok(entries)) => DomainOutcome::Completed { entries },
                Ok(Err(e)) => DomainOutcome::Failed {
                    error: e.to_string(),
                },
                Err(e) if e.is_panic() => {
                    let error = format!("warmup task panicked: {}", e);
                    error!("Domain {} {}", domain, error);
                    self.set_status(domain, WarmupStatus::Failed {
                        error: error.clone(),
                    })
                    .await;
                    DomainOutcome::Failed { error }
                }
                Err(e) => {
                    return Err(CacheError::Orchestration(format!(
                        "warmup task for {} was cancelled: {}",
                        domain, e
                    )));
                }
            };
            outcomes.insert(domain, outcome);
        }

        let report = WarmupReport {
            started_at,
            finished_at: Local::now(),
            duration: start.elapsed(),
            outcomes,
        };

        info!(
            "Cache warmup finished in {} ms: entries={}, failed={:?}",
            report.duration.as_millis(),
            report.total_entries(),
            report.failed_domains()
        );
        Ok(report)
    }

    /// 预热单个领域，可重复调用
    ///
    /// # 返回值
    ///
    /// 返回写入的缓存项数量
    pub async fn warm_domain(&self, domain: Domain) -> Result<usize> {
        self.set_status(domain, WarmupStatus::InProgress).await;
        let start = Instant::now();

        let result = match domain {
            Domain::Users => self.warm_users().await,
            Domain::Courses => self.warm_courses().await,
            Domain::Departments => self.warm_departments().await,
            Domain::Permissions => self.warm_permissions().await,
            Domain::Config => self.warm_config().await,
        };

        match &result {
            Ok(entries) => {
                info!(
                    "Domain {} warmed: {} entries in {} ms",
                    domain,
                    entries,
                    start.elapsed().as_millis()
                );
                self.set_status(domain, WarmupStatus::Completed { entries: *entries })
                    .await;
            }
            Err(e) => {
                error!("Domain {} warmup failed: {}", domain, e);
                self.set_status(domain, WarmupStatus::Failed {
                    error: e.to_string(),
                })
                .await;
            }
        }
        result
    }

    /// 查询领域最近一次的预热状态
    pub async fn status(&self, domain: Domain) -> WarmupStatus {
        let status_map = self.warmup_status.read().await;
        status_map
            .get(&domain)
            .cloned()
            .unwrap_or(WarmupStatus::Pending)
    }

    async fn set_status(&self, domain: Domain, status: WarmupStatus) {
        let mut status_map = self.warmup_status.write().await;
        status_map.insert(domain, status);
    }

    async fn put<T: Serialize + Sync>(&self, key: &str, value: &T, ttl_minutes: u64) -> Result<()> {
        let bytes = self.serializer.serialize(value)?;
        self.store
            .set(key, bytes, TtlConfig::minutes(ttl_minutes))
            .await
    }

    async fn warm_users(&self) -> Result<usize> {
        let users = &self.providers.users;
        let mut written = 0usize;

        let active = users.find_active().await?;
        for user in &active {
            self.put(&keys::user(user.id), user, self.ttl.user).await?;
            written += 1;
        }

        for user in users.find_all().await? {
            match users.permissions_of(user.id).await {
                Ok(permissions) => {
                    self.put(
                        &keys::user_permissions(user.id),
                        &permissions,
                        self.ttl.user_permissions,
                    )
                    .await?;
                    written += 1;
                }
                Err(e) => warn!("Skipping permissions of user {}: {}", user.id, e),
            }
        }

        let statistics = users.statistics().await?;
        self.put(keys::USER_STATISTICS, &statistics, self.ttl.user_statistics)
            .await?;
        written += 1;

        debug!("Users domain: {} active users cached", active.len());
        Ok(written)
    }

    async fn warm_courses(&self) -> Result<usize> {
        let courses = &self.providers.courses;
        let mut written = 0usize;

        for course in courses.find_active().await? {
            self.put(&keys::course(course.id), &course, self.ttl.course)
                .await?;
            written += 1;
        }

        let statistics = courses.statistics().await?;
        self.put(
            keys::COURSE_STATISTICS,
            &statistics,
            self.ttl.course_statistics,
        )
        .await?;
        Ok(written + 1)
    }

    async fn warm_departments(&self) -> Result<usize> {
        let departments = &self.providers.departments;
        let mut written = 0usize;

        for department in departments.find_active().await? {
            self.put(
                &keys::department(department.id),
                &department,
                self.ttl.department,
            )
            .await?;
            written += 1;
        }

        let hierarchy = departments.hierarchy().await?;
        self.put(
            keys::DEPARTMENT_HIERARCHY,
            &hierarchy,
            self.ttl.department_hierarchy,
        )
        .await?;
        Ok(written + 1)
    }

    async fn warm_permissions(&self) -> Result<usize> {
        let permissions = &self.providers.permissions;
        let mut written = 0usize;

        for permission in permissions.find_all().await? {
            self.put(
                &keys::permission(permission.id),
                &permission,
                self.ttl.permission,
            )
            .await?;
            written += 1;
        }

        let tree = permissions.tree().await?;
        self.put(keys::PERMISSION_TREE, &tree, self.ttl.permission_tree)
            .await?;
        Ok(written + 1)
    }

    async fn warm_config(&self) -> Result<usize> {
        let config = &self.providers.config;

        let system = config.system_config().await?;
        self.put(keys::SYSTEM_CONFIG, &system, self.ttl.system_config)
            .await?;
        let mut written = 1usize;

        for dict_type in &self.dictionary_types {
            let dictionary = config.dictionary(dict_type).await?;
            self.put(&keys::dictionary(dict_type), &dictionary, self.ttl.dictionary)
                .await?;
            written += 1;
        }
        Ok(written)
    }
}
