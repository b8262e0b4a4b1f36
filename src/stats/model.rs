//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了仪表板统计读模型。

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 图表数据点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            color: None,
        }
    }

    pub fn colored(label: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            color: Some(color.into()),
        }
    }
}

/// 仪表板图表集合，每个序列始终存在
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    pub student_trend: Vec<ChartPoint>,
    pub course_trend: Vec<ChartPoint>,
    pub revenue_trend: Vec<ChartPoint>,
    pub course_distribution: Vec<ChartPoint>,
    pub grade_distribution: Vec<ChartPoint>,
    pub major_distribution: Vec<ChartPoint>,
}

/// 今日快速统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickStats {
    pub today_new_students: u64,
    pub today_payments: u64,
    /// 今日收入（元，两位小数）
    pub today_revenue: f64,
    pub online_users: u64,
    pub system_alerts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub title: String,
    pub description: String,
    pub operator: String,
    pub time: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemNotification {
    pub title: String,
    pub content: String,
    pub publisher: String,
    pub time: NaiveDateTime,
}

/// 仪表板统计
///
/// 每次请求重新推导，任何数据源失败都只会让对应字段退化为默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_students: u64,
    pub total_courses: u64,
    pub total_classes: u64,
    pub total_users: u64,
    pub total_teachers: u64,
    pub active_schedules: u64,
    /// 格式化后的收入金额，例如 `¥1,234.56`
    pub monthly_revenue: String,
    pub pending_payments: u64,
    pub charts: ChartSet,
    pub quick_stats: QuickStats,
    pub recent_activities: Vec<RecentActivity>,
    pub system_notifications: Vec<SystemNotification>,
    pub generated_at: NaiveDateTime,
}
