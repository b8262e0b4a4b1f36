//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存的预热与失效机制。

pub mod invalidation;
pub mod warmup;
