// src/types/list.rs

//! # List Type Support
//!
//! Lists are stored as a `VecDeque<String>` inside the key's [`Entry`], so
//! pushes at the head are O(1) and indexed access stays cheap.
//!
//! Supported commands:
//! - `LPUSH`
//! - `LGET`
//! - `LSET`
//!
//! Every list command checks, in this order: key existence, value type,
//! then index range.

use tracing::trace;

use crate::engine::{Entry, Keyspace, Value};
use crate::error::{CacheError, Result};

/// Map a signed index onto `[0, len)`, or `IndexOutOfRange`.
fn checked_index(index: i64, len: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or(CacheError::IndexOutOfRange)
}

/// Execute LGET:
/// Return the element at `index` of the list stored at `key`.
///
/// # Errors
///
/// `NoSuchKey` if the key is absent, `WrongType` if it is not a list,
/// `IndexOutOfRange` if `index` is outside `[0, len)`.
pub fn lget(ks: &Keyspace, key: &str, index: i64) -> Result<String> {
    trace!(key, index, "LGET");
    ks.read(key, |entry| match &entry.value {
        Value::List(items) => {
            let i = checked_index(index, items.len())?;
            Ok(items[i].clone())
        }
        _ => Err(CacheError::WrongType),
    })
    .unwrap_or(Err(CacheError::NoSuchKey))
}

/// Execute LSET:
/// Replace the element at `index` of the list stored at `key`.
///
/// # Errors
///
/// Same as [`lget`].
pub fn lset(ks: &Keyspace, key: &str, index: i64, value: &str) -> Result<()> {
    trace!(key, index, "LSET");
    ks.mutate(key, |slot| {
        let entry = slot.as_mut().ok_or(CacheError::NoSuchKey)?;
        let Value::List(items) = &mut entry.value else {
            return Err(CacheError::WrongType);
        };
        let i = checked_index(index, items.len())?;
        items[i] = value.to_string();
        Ok(())
    })
}

/// Execute LPUSH:
/// Push `values` to the head (left) of the list stored at `key`, creating the
/// list if needed. `values[0]` ends up closest to the head, as if the values
/// were pushed one at a time in reverse order.
///
/// # Returns
///
/// The new length of the list.
///
/// # Errors
///
/// `WrongType` if the key holds something other than a list; nothing is
/// pushed in that case.
pub fn lpush(ks: &Keyspace, key: &str, values: &[String]) -> Result<usize> {
    trace!(key, values = values.len(), "LPUSH");
    ks.mutate(key, |slot| {
        // Empty push never materializes a new list
        if values.is_empty() {
            return match slot {
                Some(Entry { value: Value::List(items), .. }) => Ok(items.len()),
                Some(_) => Err(CacheError::WrongType),
                None => Ok(0),
            };
        }

        let entry = slot.get_or_insert_with(Entry::empty_list);
        let Value::List(items) = &mut entry.value else {
            return Err(CacheError::WrongType);
        };
        items.reserve(values.len());
        for v in values.iter().rev() {
            items.push_front(v.clone());
        }
        Ok(items.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::string;

    fn strings(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    /// Basic tests for List commands: LPUSH, LGET, LSET
    #[test]
    fn test_list_basic() -> anyhow::Result<()> {
        let ks = Keyspace::new();

        assert_eq!(lpush(&ks, "L", &strings(&["a", "b", "c"]))?, 3);
        assert_eq!(lget(&ks, "L", 0)?, "a");
        assert_eq!(lget(&ks, "L", 1)?, "b");
        assert_eq!(lget(&ks, "L", 2)?, "c");

        // A second push lands in front of the existing elements
        assert_eq!(lpush(&ks, "L", &strings(&["x", "y"]))?, 5);
        assert_eq!(lget(&ks, "L", 0)?, "x");
        assert_eq!(lget(&ks, "L", 1)?, "y");
        assert_eq!(lget(&ks, "L", 2)?, "a");
        Ok(())
    }

    #[test]
    fn test_lset_range() -> anyhow::Result<()> {
        let ks = Keyspace::new();
        lpush(&ks, "L", &strings(&["a", "b", "c"]))?;

        lset(&ks, "L", 0, "x")?;
        assert_eq!(lget(&ks, "L", 0)?, "x");

        assert!(matches!(lset(&ks, "L", 3, "x"), Err(CacheError::IndexOutOfRange)));
        assert!(matches!(lset(&ks, "L", -1, "x"), Err(CacheError::IndexOutOfRange)));
        assert!(matches!(lget(&ks, "L", 3), Err(CacheError::IndexOutOfRange)));
        assert!(matches!(lget(&ks, "L", -1), Err(CacheError::IndexOutOfRange)));
        Ok(())
    }

    #[test]
    fn test_check_order() {
        let ks = Keyspace::new();

        // existence first, even with a bad index
        assert!(matches!(lget(&ks, "missing", -5), Err(CacheError::NoSuchKey)));
        assert!(matches!(lset(&ks, "missing", 99, "v"), Err(CacheError::NoSuchKey)));
        assert!(ks.get("missing").is_none());

        // then type, even with a bad index
        string::set(&ks, "s", "plain");
        assert!(matches!(lget(&ks, "s", 99), Err(CacheError::WrongType)));
        assert!(matches!(lset(&ks, "s", 99, "v"), Err(CacheError::WrongType)));
    }

    #[test]
    fn test_lpush_wrong_type_leaves_value() {
        let ks = Keyspace::new();
        string::set(&ks, "s", "plain");
        assert!(matches!(lpush(&ks, "s", &strings(&["a"])), Err(CacheError::WrongType)));
        assert_eq!(string::get(&ks, "s").unwrap(), Some("plain".to_string()));
    }

    #[test]
    fn test_lpush_empty() -> anyhow::Result<()> {
        let ks = Keyspace::new();
        assert_eq!(lpush(&ks, "L", &[])?, 0);
        assert!(ks.get("L").is_none());

        lpush(&ks, "L", &strings(&["a"]))?;
        assert_eq!(lpush(&ks, "L", &[])?, 1);
        Ok(())
    }
}
