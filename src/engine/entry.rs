// src/engine/entry.rs

//! 每个 key 存放的内容：带标签的 value + 可选的过期时间

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

/// value 的三种形态，创建后类型固定，不做隐式转换
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    Hash(HashMap<String, String>),
    List(VecDeque<String>),
}

/// Keyspace 中的一条记录
///
/// `expires_at` 为 `None` 表示没有 TTL。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub value: Value,
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// 不带 TTL 的新记录
    pub fn new(value: Value) -> Self {
        Entry { value, expires_at: None }
    }

    pub fn scalar(s: impl Into<String>) -> Self {
        Entry::new(Value::Scalar(s.into()))
    }

    pub fn empty_hash() -> Self {
        Entry::new(Value::Hash(HashMap::new()))
    }

    pub fn empty_list() -> Self {
        Entry::new(Value::List(VecDeque::new()))
    }

    /// 在 `now` 时刻是否已经过期（到达截止时间即视为过期）
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}
