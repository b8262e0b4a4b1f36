//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了基于应用配置的静态配置数据提供者。

use super::ConfigProvider;
use crate::config::SystemConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

/// 静态配置数据提供者
///
/// 系统配置来自 `[system]` 配置段，字典为内置表，未知字典类型返回默认条目
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    system: SystemConfig,
}

impl StaticConfigProvider {
    pub fn new(system: SystemConfig) -> Self {
        Self { system }
    }

    fn dictionary_entries(dict_type: &str) -> Value {
        match dict_type {
            "user_status" => json!({"1": "启用", "0": "禁用", "-1": "删除"}),
            "gender" => json!({"M": "男", "F": "女", "U": "未知"}),
            "grade_level" => json!({"1": "一年级", "2": "二年级", "3": "三年级", "4": "四年级"}),
            _ => json!({"default": "默认值"}),
        }
    }
}

#[async_trait]
impl ConfigProvider for StaticConfigProvider {
    async fn system_config(&self) -> Result<Value> {
        Ok(json!({
            "version": self.system.version,
            "environment": self.system.environment,
            "maintenance_mode": self.system.maintenance_mode,
            "max_upload_size": self.system.max_upload_size,
            "session_timeout": self.system.session_timeout_minutes.saturating_mul(60),
            "enable_cache": true,
        }))
    }

    async fn dictionary(&self, dict_type: &str) -> Result<Value> {
        Ok(json!({
            "type": dict_type,
            "data": Self::dictionary_entries(dict_type),
            "status": "loaded",
        }))
    }
}
