// src/engine/mod.rs

//! # 引擎模块
//!
//! `engine` 是缓存服务的存储核心：
//! - `entry`：每个 key 存放的带类型 value 以及可选过期时间；
//! - `keyspace`：并发安全的 key → Entry 容器，持有全部锁。
//!
//! 命令语义（类型检查、范围检查、错误种类）在 `types` 模块中基于这里的
//! 原语实现；后台过期清理在 `expire` 模块。
pub mod entry;
pub mod keyspace;

pub use entry::{Entry, Value};
pub use keyspace::Keyspace;
