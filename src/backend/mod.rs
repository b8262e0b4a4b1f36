//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存存储接口及其内存、Redis和空操作三种实现。

pub mod memory;
pub mod noop;
pub mod redis_store;

use crate::config::{StoreConfig, StoreKind};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub use memory::MemoryStore;
pub use noop::NoopStore;
pub use redis_store::RedisStore;

/// 缓存存储特征
///
/// 带有单键TTL与模式枚举的键值存储。空操作实现满足相同契约，
/// 调用方无需判断缓存后端是否存在。
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 存储实现名称，用于日志
    fn name(&self) -> &'static str;

    /// 写入缓存值，覆盖已有值
    ///
    /// # 参数
    ///
    /// * `key` - 缓存键
    /// * `value` - 序列化后的值
    /// * `ttl` - 过期时间，零表示不过期
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// 读取缓存值，不存在或已过期时返回None
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// 删除缓存项，返回键是否存在
    async fn delete(&self, key: &str) -> Result<bool>;

    /// 批量删除，返回实际删除的数量
    async fn delete_many(&self, keys: &[String]) -> Result<usize> {
        let mut removed = 0usize;
        for key in keys {
            if self.delete(key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// 枚举匹配glob模式的所有键
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// 检查键是否存在
    async fn exists(&self, key: &str) -> Result<bool>;
}

/// 根据配置构建缓存存储
///
/// Redis连接失败时返回错误
pub async fn build_store(config: &StoreConfig) -> Result<Arc<dyn CacheStore>> {
    let store: Arc<dyn CacheStore> = match config.kind {
        StoreKind::Memory => Arc::new(MemoryStore::new(config.max_capacity)),
        StoreKind::Redis => Arc::new(RedisStore::connect(config).await?),
        StoreKind::None => Arc::new(NoopStore),
    };
    info!("Cache store initialized: {}", store.name());
    Ok(store)
}

/// 根据配置构建缓存存储，Redis不可用时降级为空操作存储
pub async fn build_store_with_fallback(config: &StoreConfig) -> Arc<dyn CacheStore> {
    match build_store(config).await {
        Ok(store) => store,
        Err(e) => {
            warn!("Cache store unavailable, falling back to no-op store: {}", e);
            Arc::new(NoopStore)
        }
    }
}
