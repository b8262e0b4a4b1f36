//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了测试的通用工具函数和伪数据提供者。

#![allow(dead_code)]

use async_trait::async_trait;
use campus_cache::config::AppConfig;
use campus_cache::domain::Domain;
use campus_cache::error::{CacheError, Result};
use campus_cache::provider::{
    ClassProvider, ConfigProvider, CourseProvider, DepartmentProvider, Fixture, FixtureProviders,
    PaymentProvider, PermissionProvider, Providers, ScheduleProvider, StaticConfigProvider,
    StudentProvider, UserProvider,
};
use campus_cache::snapshot::{GradeCount, PaymentStatistics, Record, UserStatistics};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn setup_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_span_events(FmtSpan::CLOSE)
            .with_env_filter(EnvFilter::new("debug"))
            .try_init()
            .ok();
    });
}

/// 小规模的校园数据
pub fn sample_fixture() -> Fixture {
    Fixture {
        users: vec![
            Record::new(1).with("username", "admin"),
            Record::new(2).with("username", "teacher01"),
            Record::inactive(3).with("username", "graduated"),
        ],
        user_permissions: [
            (1, json!(["system:manage", "course:read"])),
            (2, json!(["course:read"])),
            (3, json!([])),
        ]
        .into_iter()
        .collect(),
        user_statistics: Some(UserStatistics {
            total_users: 3,
            active_users: 2,
        }),
        courses: vec![
            Record::new(10).with("name", "数据结构"),
            Record::new(11).with("name", "操作系统"),
            Record::inactive(12).with("name", "已停开课程"),
        ],
        course_statistics: json!({"total": 3, "active": 2}),
        departments: vec![Record::new(100).with("name", "计算机学院")],
        department_hierarchy: json!([{"id": 100, "children": []}]),
        permissions: vec![Record::new(1000), Record::new(1001)],
        permission_tree: json!([{"id": 1000, "children": [{"id": 1001}]}]),
        total_students: 1200,
        grade_counts: vec![
            GradeCount::new("计算机2023级", 300),
            GradeCount::new("软件2024级", 200),
            GradeCount::new("英语2022级", 100),
        ],
        total_classes: 40,
        total_schedules: 120,
        payments: PaymentStatistics {
            total_records: 500,
            success_records: 450,
            success_amount: 2_250_000.0,
        },
    }
}

/// 可注入延迟与失败的伪数据提供者
///
/// 数据来自夹具，每个领域可以单独配置延迟或失败
#[derive(Clone)]
pub struct FakeProviders {
    data: FixtureProviders,
    config: StaticConfigProvider,
    delays: HashMap<Domain, Duration>,
    failing: HashSet<Domain>,
    failing_stats: bool,
    failing_permission_users: HashSet<i64>,
}

impl FakeProviders {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            data: FixtureProviders::new(fixture),
            config: StaticConfigProvider::default(),
            delays: HashMap::new(),
            failing: HashSet::new(),
            failing_stats: false,
            failing_permission_users: HashSet::new(),
        }
    }

    pub fn with_delay(mut self, domain: Domain, delay: Duration) -> Self {
        self.delays.insert(domain, delay);
        self
    }

    pub fn failing(mut self, domain: Domain) -> Self {
        self.failing.insert(domain);
        self
    }

    /// 学生、班级、课表、缴费数据源全部失败
    pub fn failing_stats(mut self) -> Self {
        self.failing_stats = true;
        self
    }

    /// 所有数据源全部失败
    pub fn failing_everything(self) -> Self {
        Domain::ALL
            .into_iter()
            .fold(self, |fake, domain| fake.failing(domain))
            .failing_stats()
    }

    pub fn failing_permissions_of(mut self, user_id: i64) -> Self {
        self.failing_permission_users.insert(user_id);
        self
    }

    pub fn into_providers(self) -> Providers {
        let fake = Arc::new(self);
        Providers {
            users: fake.clone(),
            courses: fake.clone(),
            departments: fake.clone(),
            permissions: fake.clone(),
            config: fake.clone(),
            students: fake.clone(),
            classes: fake.clone(),
            schedules: fake.clone(),
            payments: fake,
        }
    }

    async fn gate(&self, domain: Domain) -> Result<()> {
        if let Some(delay) = self.delays.get(&domain) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&domain) {
            return Err(CacheError::provider(format!("{} source unavailable", domain)));
        }
        Ok(())
    }

    fn stats_gate(&self) -> Result<()> {
        if self.failing_stats {
            return Err(CacheError::provider("statistics source unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserProvider for FakeProviders {
    async fn find_active(&self) -> Result<Vec<Record>> {
        self.gate(Domain::Users).await?;
        UserProvider::find_active(&self.data).await
    }

    async fn find_all(&self) -> Result<Vec<Record>> {
        self.gate(Domain::Users).await?;
        UserProvider::find_all(&self.data).await
    }

    async fn permissions_of(&self, user_id: i64) -> Result<Value> {
        if self.failing_permission_users.contains(&user_id) {
            return Err(CacheError::provider(format!("permissions of {} unavailable", user_id)));
        }
        self.data.permissions_of(user_id).await
    }

    async fn statistics(&self) -> Result<UserStatistics> {
        self.gate(Domain::Users).await?;
        UserProvider::statistics(&self.data).await
    }
}

#[async_trait]
impl CourseProvider for FakeProviders {
    async fn count(&self) -> Result<u64> {
        self.gate(Domain::Courses).await?;
        CourseProvider::count(&self.data).await
    }

    async fn find_active(&self) -> Result<Vec<Record>> {
        self.gate(Domain::Courses).await?;
        CourseProvider::find_active(&self.data).await
    }

    async fn statistics(&self) -> Result<Value> {
        self.gate(Domain::Courses).await?;
        CourseProvider::statistics(&self.data).await
    }
}

#[async_trait]
impl DepartmentProvider for FakeProviders {
    async fn find_active(&self) -> Result<Vec<Record>> {
        self.gate(Domain::Departments).await?;
        DepartmentProvider::find_active(&self.data).await
    }

    async fn hierarchy(&self) -> Result<Value> {
        self.gate(Domain::Departments).await?;
        self.data.hierarchy().await
    }
}

#[async_trait]
impl PermissionProvider for FakeProviders {
    async fn find_all(&self) -> Result<Vec<Record>> {
        self.gate(Domain::Permissions).await?;
        PermissionProvider::find_all(&self.data).await
    }

    async fn tree(&self) -> Result<Value> {
        self.gate(Domain::Permissions).await?;
        self.data.tree().await
    }
}

#[async_trait]
impl ConfigProvider for FakeProviders {
    async fn system_config(&self) -> Result<Value> {
        self.gate(Domain::Config).await?;
        self.config.system_config().await
    }

    async fn dictionary(&self, dict_type: &str) -> Result<Value> {
        self.gate(Domain::Config).await?;
        self.config.dictionary(dict_type).await
    }
}

#[async_trait]
impl StudentProvider for FakeProviders {
    async fn count(&self) -> Result<u64> {
        self.stats_gate()?;
        StudentProvider::count(&self.data).await
    }

    async fn count_by_grade(&self) -> Result<Vec<GradeCount>> {
        self.stats_gate()?;
        self.data.count_by_grade().await
    }
}

#[async_trait]
impl ClassProvider for FakeProviders {
    async fn count(&self) -> Result<u64> {
        self.stats_gate()?;
        ClassProvider::count(&self.data).await
    }
}

#[async_trait]
impl ScheduleProvider for FakeProviders {
    async fn count(&self) -> Result<u64> {
        self.stats_gate()?;
        ScheduleProvider::count(&self.data).await
    }
}

#[async_trait]
impl PaymentProvider for FakeProviders {
    async fn statistics(&self) -> Result<PaymentStatistics> {
        self.stats_gate()?;
        PaymentProvider::statistics(&self.data).await
    }
}

/// 默认配置，内存存储
pub fn test_config() -> AppConfig {
    AppConfig::default()
}
