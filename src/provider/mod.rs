//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了领域数据提供者接口。
//!
//! 持久化层不在本crate范围内，预热器和统计推导器只通过这些窄接口读取快照。

pub mod fixture;
pub mod static_config;

use crate::error::Result;
use crate::snapshot::{GradeCount, PaymentStatistics, Record, UserStatistics};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub use fixture::{Fixture, FixtureProviders};
pub use static_config::StaticConfigProvider;

#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn find_active(&self) -> Result<Vec<Record>>;
    async fn find_all(&self) -> Result<Vec<Record>>;
    async fn permissions_of(&self, user_id: i64) -> Result<Value>;
    async fn statistics(&self) -> Result<UserStatistics>;
}

#[async_trait]
pub trait CourseProvider: Send + Sync {
    async fn count(&self) -> Result<u64>;
    async fn find_active(&self) -> Result<Vec<Record>>;
    async fn statistics(&self) -> Result<Value>;
}

#[async_trait]
pub trait DepartmentProvider: Send + Sync {
    async fn find_active(&self) -> Result<Vec<Record>>;
    async fn hierarchy(&self) -> Result<Value>;
}

#[async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Record>>;
    async fn tree(&self) -> Result<Value>;
}

/// 系统配置与字典数据
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn system_config(&self) -> Result<Value>;
    async fn dictionary(&self, dict_type: &str) -> Result<Value>;
}

#[async_trait]
pub trait StudentProvider: Send + Sync {
    async fn count(&self) -> Result<u64>;
    async fn count_by_grade(&self) -> Result<Vec<GradeCount>>;
}

#[async_trait]
pub trait ClassProvider: Send + Sync {
    async fn count(&self) -> Result<u64>;
}

#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    async fn count(&self) -> Result<u64>;
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn statistics(&self) -> Result<PaymentStatistics>;
}

/// 数据提供者能力集合
///
/// 通过构造函数注入，测试中可以逐项替换为伪实现
#[derive(Clone)]
pub struct Providers {
    pub users: Arc<dyn UserProvider>,
    pub courses: Arc<dyn CourseProvider>,
    pub departments: Arc<dyn DepartmentProvider>,
    pub permissions: Arc<dyn PermissionProvider>,
    pub config: Arc<dyn ConfigProvider>,
    pub students: Arc<dyn StudentProvider>,
    pub classes: Arc<dyn ClassProvider>,
    pub schedules: Arc<dyn ScheduleProvider>,
    pub payments: Arc<dyn PaymentProvider>,
}

impl Providers {
    /// 所有领域都由同一份夹具数据提供
    pub fn from_fixture(fixture: Arc<FixtureProviders>, config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            users: fixture.clone(),
            courses: fixture.clone(),
            departments: fixture.clone(),
            permissions: fixture.clone(),
            config,
            students: fixture.clone(),
            classes: fixture.clone(),
            schedules: fixture.clone(),
            payments: fixture,
        }
    }
}
