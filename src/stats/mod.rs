//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了仪表板统计推导，包括启发式规则与读模型。

pub mod deriver;
pub mod heuristics;
pub mod model;

pub use deriver::StatisticsDeriver;
pub use model::{
    ChartPoint, ChartSet, DashboardStats, QuickStats, RecentActivity, SystemNotification,
};
