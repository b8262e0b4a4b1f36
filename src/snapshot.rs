//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了数据提供者返回的领域快照类型。
//!
//! 快照在每次预热或统计时重新获取，用完即弃，没有身份语义。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_active() -> bool {
    true
}

/// 不透明的领域记录
///
/// 只有 `id` 与 `active` 对预热有意义，其余字段原样写入缓存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Record {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            active: true,
            attributes: Map::new(),
        }
    }

    pub fn inactive(id: i64) -> Self {
        Self {
            active: false,
            ..Self::new(id)
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}

/// 用户聚合统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub total_users: u64,
    pub active_users: u64,
}

/// 缴费聚合统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatistics {
    pub total_records: u64,
    pub success_records: u64,
    /// 成功缴费金额（元）
    pub success_amount: f64,
}

/// 按年级统计的学生数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCount {
    pub grade: String,
    pub count: u64,
}

impl GradeCount {
    pub fn new(grade: impl Into<String>, count: u64) -> Self {
        Self {
            grade: grade.into(),
            count,
        }
    }
}
