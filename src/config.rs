//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存预热与统计系统的配置结构和解析逻辑。

use crate::domain::{keys, Domain};
use crate::error::{CacheError, Result};
use crate::utils::validate_cache_key;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_VERSION: u32 = 1;

/// 单个TTL允许的最大值（分钟），30天
const MAX_TTL_MINUTES: u64 = 60 * 24 * 30;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub config_version: Option<u32>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ttl: TtlConfig,
    #[serde(default)]
    pub warmup: WarmupConfig,
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

/// 缓存存储类型枚举
///
/// 启动时根据配置选择具体的存储策略
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// 进程内存储
    #[default]
    Memory,
    /// Redis存储
    Redis,
    /// 无缓存后端，所有操作记录后跳过
    None,
}

/// 缓存存储配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Redis连接字符串
    pub connection_string: SecretString,
    /// 连接超时时间（毫秒）
    pub connection_timeout_ms: u64,
    /// 内存存储最大条目数
    pub max_capacity: u64,
    /// 写入前对值进行gzip压缩
    pub compress: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            connection_string: SecretString::new("redis://localhost:6379".to_string().into()),
            connection_timeout_ms: 5000,
            max_capacity: 100_000,
            compress: false,
        }
    }
}

/// 各类缓存条目的过期时间（分钟）
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TtlConfig {
    pub user: u64,
    pub user_permissions: u64,
    pub user_statistics: u64,
    pub course: u64,
    pub course_statistics: u64,
    pub department: u64,
    pub department_hierarchy: u64,
    pub permission: u64,
    pub permission_tree: u64,
    pub system_config: u64,
    pub dictionary: u64,
    pub dashboard_stats: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            user: 30,
            user_permissions: 60,
            user_statistics: 60,
            course: 60,
            course_statistics: 120,
            department: 120,
            department_hierarchy: 240,
            permission: 240,
            permission_tree: 480,
            system_config: 600,
            dictionary: 720,
            dashboard_stats: 5,
        }
    }
}

impl TtlConfig {
    /// 将分钟数转换为 `Duration`
    pub fn minutes(minutes: u64) -> Duration {
        Duration::from_secs(minutes.saturating_mul(60))
    }

    fn entries(&self) -> [(&'static str, u64); 12] {
        [
            ("user", self.user),
            ("user_permissions", self.user_permissions),
            ("user_statistics", self.user_statistics),
            ("course", self.course),
            ("course_statistics", self.course_statistics),
            ("department", self.department),
            ("department_hierarchy", self.department_hierarchy),
            ("permission", self.permission),
            ("permission_tree", self.permission_tree),
            ("system_config", self.system_config),
            ("dictionary", self.dictionary),
            ("dashboard_stats", self.dashboard_stats),
        ]
    }
}

/// 缓存预热配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct WarmupConfig {
    /// 是否在启动时执行全量预热
    pub warm_on_start: bool,
    /// 调用方施加的整体截止时间（秒），组件内部不做单领域超时
    pub deadline_seconds: Option<u64>,
    /// 仪表盘刷新时预热的领域
    pub dashboard_domains: Vec<Domain>,
    /// 基础统计刷新时预热的领域
    pub basic_stats_domains: Vec<Domain>,
    /// 预热的字典类型
    pub dictionary_types: Vec<String>,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            warm_on_start: true,
            deadline_seconds: Some(300),
            dashboard_domains: vec![Domain::Users, Domain::Courses, Domain::Departments],
            basic_stats_domains: vec![Domain::Users, Domain::Courses, Domain::Departments],
            dictionary_types: vec![
                "user_status".to_string(),
                "course_type".to_string(),
                "grade_level".to_string(),
                "semester".to_string(),
            ],
        }
    }
}

/// 统计推导使用的启发式参数
///
/// 这些常量只是为了生成看起来合理的演示数据，可按部署调整。
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// 未来月份的外推增长率
    pub growth_rate: f64,
    /// 教师占用户总数的比例
    pub teacher_ratio: f64,
    /// 每日新增学生基础比例
    pub new_student_rate: f64,
    /// 学期初新增学生的放大倍数
    pub semester_factor: f64,
    /// 每日缴费基础比例
    pub payment_rate: f64,
    pub payment_business_hours: f64,
    pub payment_evening: f64,
    pub payment_off_hours: f64,
    /// 每日收入基础比例
    pub revenue_rate: f64,
    pub revenue_business_hours: f64,
    pub revenue_off_hours: f64,
    /// 各时段在线率
    pub online_morning: f64,
    pub online_afternoon: f64,
    pub online_evening: f64,
    pub online_lunch: f64,
    pub online_night: f64,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            growth_rate: 0.02,
            teacher_ratio: 0.1,
            new_student_rate: 0.001,
            semester_factor: 2.0,
            payment_rate: 0.005,
            payment_business_hours: 1.8,
            payment_evening: 1.3,
            payment_off_hours: 0.2,
            revenue_rate: 0.008,
            revenue_business_hours: 1.5,
            revenue_off_hours: 0.6,
            online_morning: 0.35,
            online_afternoon: 0.40,
            online_evening: 0.25,
            online_lunch: 0.15,
            online_night: 0.05,
        }
    }
}

impl HeuristicsConfig {
    fn rates(&self) -> [(&'static str, f64); 10] {
        [
            ("growth_rate", self.growth_rate),
            ("teacher_ratio", self.teacher_ratio),
            ("new_student_rate", self.new_student_rate),
            ("payment_rate", self.payment_rate),
            ("revenue_rate", self.revenue_rate),
            ("online_morning", self.online_morning),
            ("online_afternoon", self.online_afternoon),
            ("online_evening", self.online_evening),
            ("online_lunch", self.online_lunch),
            ("online_night", self.online_night),
        ]
    }
}

/// 系统配置（作为 `system:config` 缓存条目写入）
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SystemConfig {
    pub version: String,
    pub environment: String,
    pub maintenance_mode: bool,
    pub max_upload_size: String,
    pub session_timeout_minutes: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            environment: "default".to_string(),
            maintenance_mode: false,
            max_upload_size: "10MB".to_string(),
            session_timeout_minutes: 30,
        }
    }
}

impl AppConfig {
    /// 从TOML字符串解析并验证配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| CacheError::Config(e.to_string()))?;
        config.validate().map_err(CacheError::Config)?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 验证配置
    ///
    /// 检查配置的有效性，确保所有值都在合理范围内
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(version) = self.config_version {
            if version > CONFIG_VERSION {
                return Err(format!(
                    "Configuration version {} is not supported. Current version is {}.",
                    version, CONFIG_VERSION
                ));
            }
        }

        if self.store.kind == StoreKind::Redis
            && !(100..=30000).contains(&self.store.connection_timeout_ms)
        {
            return Err("store connection_timeout_ms must be between 100 and 30000 ms".to_string());
        }

        if self.store.kind == StoreKind::Memory && self.store.max_capacity == 0 {
            return Err("store max_capacity cannot be zero".to_string());
        }

        for (name, minutes) in self.ttl.entries() {
            if minutes == 0 {
                return Err(format!("ttl.{} cannot be zero", name));
            }
            if minutes > MAX_TTL_MINUTES {
                return Err(format!("ttl.{} cannot exceed 30 days", name));
            }
        }

        if let Some(deadline) = self.warmup.deadline_seconds {
            if deadline == 0 || deadline > 3600 {
                return Err("warmup deadline_seconds must be between 1 and 3600".to_string());
            }
        }

        if self.warmup.dashboard_domains.is_empty() {
            return Err("warmup dashboard_domains cannot be empty".to_string());
        }

        if self.warmup.basic_stats_domains.is_empty() {
            return Err("warmup basic_stats_domains cannot be empty".to_string());
        }

        if self.warmup.dictionary_types.iter().any(|t| t.trim().is_empty()) {
            return Err("warmup dictionary_types cannot contain empty names".to_string());
        }
        for name in &self.warmup.dictionary_types {
            validate_cache_key(&keys::dictionary(name))
                .map_err(|e| format!("warmup dictionary type '{}': {}", name, e))?;
        }

        for (name, rate) in self.heuristics.rates() {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("heuristics.{} must be between 0 and 1", name));
            }
        }

        let multipliers = [
            self.heuristics.semester_factor,
            self.heuristics.payment_business_hours,
            self.heuristics.payment_evening,
            self.heuristics.payment_off_hours,
            self.heuristics.revenue_business_hours,
            self.heuristics.revenue_off_hours,
        ];
        if multipliers.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err("heuristics multipliers must be finite and non-negative".to_string());
        }

        Ok(())
    }

    /// 调用方整体截止时间
    pub fn warmup_deadline(&self) -> Option<Duration> {
        self.warmup.deadline_seconds.map(Duration::from_secs)
    }
}
