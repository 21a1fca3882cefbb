// src/types/hash.rs

//! 支持 Hash 类型：每个 key 对应一个 field → value 的映射
//!
//! HSET 是批量且全有或全无的：目标 key 类型不对时，一个 field 都不写。

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::engine::{Entry, Keyspace, Value};
use crate::error::{CacheError, Result};

/// HSET 的一对 field / value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub field: String,
    pub value: String,
}

impl FieldValue {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        FieldValue { field: field.into(), value: value.into() }
    }
}

/// HGET key field
/// key 或 field 不存在时返回 `None`，类型不符时返回 `WrongType`
pub fn hget(ks: &Keyspace, key: &str, field: &str) -> Result<Option<String>> {
    trace!(key, field, "HGET");
    let found = ks.read(key, |entry| match &entry.value {
        Value::Hash(map) => Ok(map.get(field).cloned()),
        _ => Err(CacheError::WrongType),
    });
    match found {
        Some(res) => res,
        None => Ok(None),
    }
}

/// HSET key [field value ...]
/// 按输入顺序写入，同一批次里后出现的 field 覆盖先出现的。
/// 返回写入的 pair 数量。
pub fn hset(ks: &Keyspace, key: &str, pairs: &[FieldValue]) -> Result<usize> {
    trace!(key, pairs = pairs.len(), "HSET");
    ks.mutate(key, |slot| {
        // 空批次不创建 key
        if pairs.is_empty() {
            return match slot {
                Some(Entry { value: Value::Hash(_), .. }) | None => Ok(0),
                Some(_) => Err(CacheError::WrongType),
            };
        }

        let entry = slot.get_or_insert_with(Entry::empty_hash);
        let Value::Hash(map) = &mut entry.value else {
            return Err(CacheError::WrongType);
        };
        for pair in pairs {
            map.insert(pair.field.clone(), pair.value.clone());
        }
        Ok(pairs.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::string;

    #[test]
    fn test_hash_basic() -> anyhow::Result<()> {
        let ks = Keyspace::new();

        // HSET 新建
        let n = hset(&ks, "myhash", &[FieldValue::new("f1", "v1"), FieldValue::new("f2", "v2")])?;
        assert_eq!(n, 2);
        // HGET 存在
        assert_eq!(hget(&ks, "myhash", "f1")?, Some("v1".to_string()));
        // HGET field 不存在
        assert_eq!(hget(&ks, "myhash", "nope")?, None);
        // HGET key 不存在
        assert_eq!(hget(&ks, "other", "f1")?, None);

        // HSET 覆盖已有 field
        hset(&ks, "myhash", &[FieldValue::new("f1", "v1a")])?;
        assert_eq!(hget(&ks, "myhash", "f1")?, Some("v1a".to_string()));
        assert_eq!(hget(&ks, "myhash", "f2")?, Some("v2".to_string()));
        Ok(())
    }

    #[test]
    fn test_last_pair_in_batch_wins() -> anyhow::Result<()> {
        let ks = Keyspace::new();
        let n = hset(&ks, "h", &[FieldValue::new("f", "a"), FieldValue::new("f", "b")])?;
        assert_eq!(n, 2);
        assert_eq!(hget(&ks, "h", "f")?, Some("b".to_string()));
        Ok(())
    }

    #[test]
    fn test_wrong_type_applies_nothing() {
        let ks = Keyspace::new();
        string::set(&ks, "s", "plain");

        let res = hset(&ks, "s", &[FieldValue::new("f", "v")]);
        assert!(matches!(res, Err(CacheError::WrongType)));
        assert!(matches!(hget(&ks, "s", "f"), Err(CacheError::WrongType)));
        // 原值保持不变
        assert_eq!(string::get(&ks, "s").unwrap(), Some("plain".to_string()));
    }

    #[test]
    fn test_empty_batch() {
        let ks = Keyspace::new();
        assert_eq!(hset(&ks, "h", &[]).unwrap(), 0);
        assert!(ks.get("h").is_none());

        string::set(&ks, "s", "plain");
        assert!(matches!(hset(&ks, "s", &[]), Err(CacheError::WrongType)));
    }
}
