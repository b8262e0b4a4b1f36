//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了基于JSON夹具文件的数据提供者，供命令行工具和测试使用。

use super::{
    ClassProvider, CourseProvider, DepartmentProvider, PaymentProvider, PermissionProvider,
    ScheduleProvider, StudentProvider, UserProvider,
};
use crate::error::{CacheError, Result};
use crate::snapshot::{GradeCount, PaymentStatistics, Record, UserStatistics};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// 夹具数据
///
/// 缺省字段均为空，聚合统计未给出时由记录列表推算
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub users: Vec<Record>,
    pub user_permissions: BTreeMap<i64, Value>,
    pub user_statistics: Option<UserStatistics>,
    pub courses: Vec<Record>,
    pub course_statistics: Value,
    pub departments: Vec<Record>,
    pub department_hierarchy: Value,
    pub permissions: Vec<Record>,
    pub permission_tree: Value,
    pub total_students: u64,
    pub grade_counts: Vec<GradeCount>,
    pub total_classes: u64,
    pub total_schedules: u64,
    pub payments: PaymentStatistics,
}

impl Fixture {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// 夹具数据提供者，实现除配置外的全部提供者接口
#[derive(Debug, Clone, Default)]
pub struct FixtureProviders {
    fixture: Fixture,
}

impl FixtureProviders {
    pub fn new(fixture: Fixture) -> Self {
        Self { fixture }
    }

    fn active(records: &[Record]) -> Vec<Record> {
        records.iter().filter(|r| r.active).cloned().collect()
    }
}

#[async_trait]
impl UserProvider for FixtureProviders {
    async fn find_active(&self) -> Result<Vec<Record>> {
        Ok(Self::active(&self.fixture.users))
    }

    async fn find_all(&self) -> Result<Vec<Record>> {
        Ok(self.fixture.users.clone())
    }

    async fn permissions_of(&self, user_id: i64) -> Result<Value> {
        Ok(self
            .fixture
            .user_permissions
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }

    async fn statistics(&self) -> Result<UserStatistics> {
        if let Some(stats) = self.fixture.user_statistics {
            return Ok(stats);
        }
        let users = &self.fixture.users;
        Ok(UserStatistics {
            total_users: users.len() as u64,
            active_users: users.iter().filter(|u| u.active).count() as u64,
        })
    }
}

#[async_trait]
impl CourseProvider for FixtureProviders {
    async fn count(&self) -> Result<u64> {
        Ok(self.fixture.courses.len() as u64)
    }

    async fn find_active(&self) -> Result<Vec<Record>> {
        Ok(Self::active(&self.fixture.courses))
    }

    async fn statistics(&self) -> Result<Value> {
        if !self.fixture.course_statistics.is_null() {
            return Ok(self.fixture.course_statistics.clone());
        }
        let courses = &self.fixture.courses;
        Ok(serde_json::json!({
            "total": courses.len(),
            "active": courses.iter().filter(|c| c.active).count(),
        }))
    }
}

#[async_trait]
impl DepartmentProvider for FixtureProviders {
    async fn find_active(&self) -> Result<Vec<Record>> {
        Ok(Self::active(&self.fixture.departments))
    }

    async fn hierarchy(&self) -> Result<Value> {
        Ok(self.fixture.department_hierarchy.clone())
    }
}

#[async_trait]
impl PermissionProvider for FixtureProviders {
    async fn find_all(&self) -> Result<Vec<Record>> {
        Ok(self.fixture.permissions.clone())
    }

    async fn tree(&self) -> Result<Value> {
        Ok(self.fixture.permission_tree.clone())
    }
}

#[async_trait]
impl StudentProvider for FixtureProviders {
    async fn count(&self) -> Result<u64> {
        Ok(self.fixture.total_students)
    }

    async fn count_by_grade(&self) -> Result<Vec<GradeCount>> {
        Ok(self.fixture.grade_counts.clone())
    }
}

#[async_trait]
impl ClassProvider for FixtureProviders {
    async fn count(&self) -> Result<u64> {
        Ok(self.fixture.total_classes)
    }
}

#[async_trait]
impl ScheduleProvider for FixtureProviders {
    async fn count(&self) -> Result<u64> {
        Ok(self.fixture.total_schedules)
    }
}

#[async_trait]
impl PaymentProvider for FixtureProviders {
    async fn statistics(&self) -> Result<PaymentStatistics> {
        Ok(self.fixture.payments)
    }
}
