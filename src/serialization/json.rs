//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了JSON序列化器的实现。

use super::Serializer;
use crate::config::StoreConfig;
use crate::error::{CacheError, Result};
use serde::{de::DeserializeOwned, Serialize};

/// JSON序列化器
///
/// 快照与统计结果以JSON写入缓存，可选gzip压缩
#[derive(Clone, Debug)]
pub struct JsonSerializer {
    compress: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self { compress: false }
    }

    /// 按存储配置中的 `compress` 开关创建序列化器
    ///
    /// 未启用 `compression` 特性时退化为不压缩
    pub fn for_store(config: &StoreConfig) -> Self {
        Self {
            compress: config.compress,
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.compress && cfg!(feature = "compression")
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let json_bytes =
            serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))?;

        if !self.is_compressed() {
            return Ok(json_bytes);
        }

        #[cfg(feature = "compression")]
        {
            use flate2::write::GzEncoder;
            use flate2::Compression;
            use std::io::Write;

            let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
            encoder
                .write_all(&json_bytes)
                .map_err(|e| CacheError::Serialization(e.to_string()))?;
            encoder
                .finish()
                .map_err(|e| CacheError::Serialization(e.to_string()))
        }

        #[cfg(not(feature = "compression"))]
        {
            Ok(json_bytes)
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        if !self.is_compressed() {
            return serde_json::from_slice(data)
                .map_err(|e| CacheError::Serialization(e.to_string()));
        }

        #[cfg(feature = "compression")]
        let json_bytes = {
            use flate2::read::GzDecoder;
            use std::io::Read;

            let mut decoder = GzDecoder::new(data);
            let mut decoded = Vec::new();
            decoder
                .read_to_end(&mut decoded)
                .map_err(|e| CacheError::Serialization(e.to_string()))?;
            decoded
        };

        #[cfg(not(feature = "compression"))]
        let json_bytes = data.to_vec();

        serde_json::from_slice(&json_bytes).map_err(|e| CacheError::Serialization(e.to_string()))
    }
}
