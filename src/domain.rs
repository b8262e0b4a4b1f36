//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了独立预热的数据领域及其缓存键命名空间。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 预热数据领域
///
/// 每个领域拥有独立的键前缀，并发写入时互不冲突。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Users,
    Courses,
    Departments,
    Permissions,
    Config,
}

impl Domain {
    /// 全量预热涉及的所有领域
    pub const ALL: [Domain; 5] = [
        Domain::Users,
        Domain::Courses,
        Domain::Departments,
        Domain::Permissions,
        Domain::Config,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Users => "users",
            Domain::Courses => "courses",
            Domain::Departments => "departments",
            Domain::Permissions => "permissions",
            Domain::Config => "config",
        }
    }

    /// 领域拥有的键模式
    ///
    /// 配置领域同时写入 `system:` 与 `dict:` 两个命名空间。
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            Domain::Users => &["user:*"],
            Domain::Courses => &["course:*"],
            Domain::Departments => &["department:*"],
            Domain::Permissions => &["permission:*"],
            Domain::Config => &["system:*", "dict:*"],
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 仪表板读模型所在的命名空间
pub const DASHBOARD_PATTERN: &str = "dashboard:*";

/// 基础统计所在的命名空间
pub const BASIC_STATS_PATTERN: &str = "stats:*";

/// 所有受管理的键模式，用于统计与全量清理
pub const MANAGED_PATTERNS: [&str; 8] = [
    "user:*",
    "course:*",
    "department:*",
    "permission:*",
    "system:*",
    "dict:*",
    DASHBOARD_PATTERN,
    BASIC_STATS_PATTERN,
];

/// 核心领域的预热指示键（用户、课程、配置）
pub const WARMUP_INDICATOR_KEYS: [&str; 3] = [
    keys::USER_STATISTICS,
    keys::COURSE_STATISTICS,
    keys::SYSTEM_CONFIG,
];

/// 缓存键构造
pub mod keys {
    pub const USER_STATISTICS: &str = "user:statistics";
    pub const COURSE_STATISTICS: &str = "course:statistics";
    pub const DEPARTMENT_HIERARCHY: &str = "department:hierarchy";
    pub const PERMISSION_TREE: &str = "permission:tree";
    pub const SYSTEM_CONFIG: &str = "system:config";
    pub const DASHBOARD_STATS: &str = "dashboard:stats";

    pub fn user(id: i64) -> String {
        format!("user:{}", id)
    }

    pub fn user_permissions(id: i64) -> String {
        format!("user:permissions:{}", id)
    }

    pub fn course(id: i64) -> String {
        format!("course:{}", id)
    }

    pub fn department(id: i64) -> String {
        format!("department:{}", id)
    }

    pub fn permission(id: i64) -> String {
        format!("permission:{}", id)
    }

    pub fn dictionary(dict_type: &str) -> String {
        format!("dict:{}", dict_type)
    }
}
