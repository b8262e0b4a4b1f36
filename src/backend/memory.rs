//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了进程内缓存存储的实现。

use super::CacheStore;
use crate::error::Result;
use crate::utils::{glob_to_regex, validate_cache_key};
use async_trait::async_trait;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// 进程内缓存存储
///
/// 基于Moka实现，每个条目携带自身的过期时刻，读取时惰性淘汰
#[derive(Clone)]
pub struct MemoryStore {
    // 值: (数据, 过期时间)
    cache: Cache<String, (Vec<u8>, Option<Instant>)>,
}

impl MemoryStore {
    /// 创建新的内存存储
    ///
    /// # 参数
    ///
    /// * `capacity` - 最大条目数
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    fn is_expired(expire_at: &Option<Instant>) -> bool {
        matches!(expire_at, Some(t) if Instant::now() >= *t)
    }

    async fn live_entry(&self, key: &str) -> Option<Vec<u8>> {
        let (bytes, expire_at) = self.cache.get(key).await?;
        if Self::is_expired(&expire_at) {
            self.cache.remove(key).await;
            debug!("Memory store: key={} expired, removed", key);
            return None;
        }
        Some(bytes)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    #[instrument(skip(self, value), level = "debug", fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        validate_cache_key(key)?;
        let expire_at = if ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + ttl)
        };
        self.cache.insert(key.to_string(), (value, expire_at)).await;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.live_entry(key).await)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<bool> {
        let removed = self.cache.remove(key).await;
        Ok(matches!(removed, Some((_, expire_at)) if !Self::is_expired(&expire_at)))
    }

    #[instrument(skip(self), level = "debug")]
    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = glob_to_regex(pattern)?;
        let mut keys: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, (_, expire_at))| {
                !Self::is_expired(expire_at) && matcher.is_match(key.as_str())
            })
            .map(|(key, _)| key.to_string())
            .collect();
        keys.sort();
        debug!("Memory store: pattern={} matched {} keys", pattern, keys.len());
        Ok(keys)
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.live_entry(key).await.is_some())
    }
}
