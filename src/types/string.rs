// src/types/string.rs

//! String 类型的简单存取操作
//!
//! - SET key value → 覆盖为 Scalar，并清除原有 TTL（无论原来是什么类型）
//! - GET key → `Some(value)`；key 不存在时 `None`；类型不符时 `WrongType`

use tracing::trace;

use crate::engine::{Entry, Keyspace, Value};
use crate::error::{CacheError, Result};

/// 将一个字符串写入指定的键，已有值（及其 TTL）会被整体替换。
///
/// # 示例
///
/// ```
/// use crab_cache::engine::Keyspace;
/// use crab_cache::types::string;
///
/// let ks = Keyspace::new();
/// string::set(&ks, "foo", "bar");
/// assert_eq!(string::get(&ks, "foo").unwrap(), Some("bar".to_string()));
/// ```
pub fn set(ks: &Keyspace, key: &str, value: &str) {
    trace!(key, "SET");
    ks.put(key, Entry::scalar(value));
}

/// 从指定键读取一个字符串。
///
/// # 返回
/// - `Ok(Some(value))` – 键存在且为 Scalar
/// - `Ok(None)`        – 键不存在或已过期
///
/// # 错误
/// - 键存在但不是 Scalar 时返回 `WrongType`
pub fn get(ks: &Keyspace, key: &str) -> Result<Option<String>> {
    trace!(key, "GET");
    ks.read(key, |entry| match &entry.value {
        Value::Scalar(s) => Ok(s.clone()),
        _ => Err(CacheError::WrongType),
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{hash, list};
    use std::time::{Duration, Instant};

    #[test]
    fn test_set_and_get() {
        let ks = Keyspace::new();
        set(&ks, "k", "v");
        assert_eq!(get(&ks, "k").unwrap(), Some("v".to_string()));

        // 覆盖
        set(&ks, "k", "v2");
        assert_eq!(get(&ks, "k").unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn test_get_missing_is_not_an_error() {
        let ks = Keyspace::new();
        assert_eq!(get(&ks, "nope").unwrap(), None);
    }

    #[test]
    fn test_get_wrong_type() {
        let ks = Keyspace::new();
        list::lpush(&ks, "l", &["a".to_string()]).unwrap();
        assert!(matches!(get(&ks, "l"), Err(CacheError::WrongType)));
    }

    #[test]
    fn test_set_replaces_other_variant_and_clears_ttl() {
        let ks = Keyspace::new();
        hash::hset(&ks, "k", &[hash::FieldValue::new("f", "v")]).unwrap();
        ks.mutate("k", |slot| {
            if let Some(entry) = slot {
                entry.expires_at = Some(Instant::now() + Duration::from_secs(60));
            }
        });

        set(&ks, "k", "plain");
        let entry = ks.get("k").unwrap();
        assert_eq!(entry.value, Value::Scalar("plain".into()));
        assert!(entry.expires_at.is_none());
    }
}
