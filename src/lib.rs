// src/lib.rs
//! crab-cache 库：engine / types / expire / server / api / config

pub mod api;       // HTTP 请求 / 响应体
pub mod config;    // 配置加载
pub mod engine;    // 存储核心（Entry + Keyspace）
pub mod error;     // 命令层错误类型
pub mod expire;    // 过期策略 & 后台清理
pub mod server;    // HTTP 网络层 & 命令分发
pub mod types;     // String / Hash / List / key 级命令
