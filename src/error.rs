// src/error.rs

//! 命令层错误类型
//!
//! 所有错误都是可恢复的，逐次调用返回给调用方，不会让进程退出。

use thiserror::Error;

/// 命令执行失败的原因（封闭枚举）
#[derive(Debug, Error)]
pub enum CacheError {
    /// key 存在，但 value 的类型与命令不匹配
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    /// list 命令作用在不存在的 key 上
    #[error("ERR no such key")]
    NoSuchKey,

    /// 下标不在 [0, len) 内
    #[error("ERR index out of range")]
    IndexOutOfRange,

    /// KEYS 的 pattern 不是合法正则
    #[error("ERR invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;
