//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存预热与统计子系统的错误类型。

use thiserror::Error;

/// 缓存子系统错误类型枚举
///
/// 领域级别的失败会在各自的任务内被捕获并记录，
/// 只有编排层面的失败才会以 `Err` 的形式返回给调用方。
#[derive(Error, Debug)]
pub enum CacheError {
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 缓存存储操作失败
    #[error("Store operation failed: {0}")]
    Store(String),

    /// 数据提供者调用失败
    #[error("Provider error: {0}")]
    Provider(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// Redis错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 超时错误
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// 并发编排失败（任务被运行时取消等）
    #[error("Orchestration error: {0}")]
    Orchestration(String),
}

impl CacheError {
    /// 便捷构造数据提供者错误
    pub fn provider(msg: impl Into<String>) -> Self {
        CacheError::Provider(msg.into())
    }
}

/// 缓存操作结果类型别名
pub type Result<T> = std::result::Result<T, CacheError>;
