// src/types/keys.rs

//! 与值类型无关的 key 级命令：DEL、KEYS

use regex::Regex;
use tracing::trace;

use crate::engine::Keyspace;
use crate::error::Result;

/// DEL key
/// 返回 true 表示确实删除了一个存在的 key
pub fn del(ks: &Keyspace, key: &str) -> bool {
    trace!(key, "DEL");
    ks.remove(key)
}

/// KEYS pattern
///
/// `pattern` 是正则表达式，必须匹配整个 key（不是子串，也不是 glob）。
/// 结果按字典序排序。
///
/// # 错误
/// - pattern 不是合法正则时返回 `InvalidPattern`
pub fn keys(ks: &Keyspace, pattern: &str) -> Result<Vec<String>> {
    trace!(pattern, "KEYS");
    let re = Regex::new(&format!("^(?:{})$", pattern))?;
    let mut out = ks.scan(|k| re.is_match(k));
    out.sort();
    Ok(out)
}
