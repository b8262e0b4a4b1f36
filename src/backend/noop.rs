//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了未配置缓存后端时使用的空操作存储。

use super::CacheStore;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// 空操作存储
///
/// 每个操作都只记录一条跳过日志：写入成功但不保存，读取总是未命中
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl CacheStore for NoopStore {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        debug!(
            "NoopStore: skip set key={}, value_len={}, ttl={:?}",
            key,
            value.len(),
            ttl
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        debug!("NoopStore: skip get key={}", key);
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        debug!("NoopStore: skip delete key={}", key);
        Ok(false)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        debug!("NoopStore: skip keys pattern={}", pattern);
        Ok(Vec::new())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        debug!("NoopStore: skip exists key={}", key);
        Ok(false)
    }
}
