// src/engine/keyspace.rs

//! # Keyspace
//!
//! key → Entry 的并发容器，负责全部加锁。
//!
//! 底层是 `DashMap` 分片锁表：不同分片上的 key 互不竞争，同一个 key 的操作
//! 一定落在同一个分片锁上串行执行。Hash / List 内部的修改只能通过
//! [`Keyspace::mutate`] 在该分片的写锁下完成，调用结束后不会有任何引用
//! 泄漏到锁外。
//!
//! 所有读路径都做惰性过期：看到已过期的记录时当作不存在，并顺手删除。

use std::time::Instant;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as Slot;

use super::entry::{Entry, Value};

#[derive(Debug, Default)]
pub struct Keyspace {
    data: DashMap<String, Entry>,
}

impl Keyspace {
    pub fn new() -> Self {
        Keyspace::default()
    }

    /// 读取 key 的一份拷贝；已过期则删除并返回 `None`
    pub fn get(&self, key: &str) -> Option<Entry> {
        self.read(key, Entry::clone)
    }

    /// 在分片读锁下对存活的 Entry 执行只读闭包
    ///
    /// 用于只需要取出一个 field / 元素的命令，避免整体克隆容器。
    pub fn read<R>(&self, key: &str, f: impl FnOnce(&Entry) -> R) -> Option<R> {
        let now = Instant::now();
        if let Some(entry) = self.data.get(key) {
            if !entry.is_expired(now) {
                return Some(f(&entry));
            }
        } else {
            return None;
        }
        // 读锁已释放，再走写路径删除
        self.remove_if_expired(key);
        None
    }

    /// 无条件覆盖
    pub fn put(&self, key: &str, entry: Entry) {
        self.data.insert(key.to_owned(), entry);
    }

    /// 删除 key，存在（且未过期）时返回 true
    pub fn remove(&self, key: &str) -> bool {
        let now = Instant::now();
        self.data
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now))
    }

    /// 独占地访问一个 key 的槽位
    ///
    /// `f` 拿到 `&mut Option<Entry>`：`None` 表示 key 不存在（或已过期）。
    /// - 把 `None` 换成 `Some(..)` 即创建；
    /// - 把 `Some(..)` 换成 `None` 即删除；
    /// - 原地修改即更新。
    ///
    /// 整个闭包在该 key 所在分片的写锁内执行，闭包内不得再访问 Keyspace。
    pub fn mutate<R>(&self, key: &str, f: impl FnOnce(&mut Option<Entry>) -> R) -> R {
        let now = Instant::now();
        match self.data.entry(key.to_owned()) {
            Slot::Occupied(mut occupied) => {
                // 先把值移出来，占位的是一条已过期的空记录（空 String 不分配）。
                // 闭包 panic 时占位留在表里，所有读路径都把它当作不存在。
                let tombstone = Entry { value: Value::Scalar(String::new()), expires_at: Some(now) };
                let current = std::mem::replace(occupied.get_mut(), tombstone);
                let mut slot = (!current.is_expired(now)).then_some(current);
                let out = f(&mut slot);
                match slot {
                    Some(entry) => *occupied.get_mut() = entry,
                    None => {
                        occupied.remove();
                    }
                }
                out
            }
            Slot::Vacant(vacant) => {
                let mut slot = None;
                let out = f(&mut slot);
                if let Some(entry) = slot {
                    vacant.insert(entry);
                }
                out
            }
        }
    }

    /// 按谓词过滤当前存活的 key
    ///
    /// 一次只持有一个分片的读锁；遍历中遇到的过期 key 在遍历结束后逐个删除。
    pub fn scan(&self, mut pred: impl FnMut(&str) -> bool) -> Vec<String> {
        let now = Instant::now();
        let mut matched = Vec::new();
        let mut expired = Vec::new();

        for item in self.data.iter() {
            if item.value().is_expired(now) {
                expired.push(item.key().clone());
            } else if pred(item.key()) {
                matched.push(item.key().clone());
            }
        }

        for key in &expired {
            self.remove_if_expired(key);
        }
        matched
    }

    /// 当前已过期（尚未删除）的 key 快照
    pub fn expired_keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.data
            .iter()
            .filter(|item| item.value().is_expired(now))
            .map(|item| item.key().clone())
            .collect()
    }

    /// 在该 key 的锁内重新检查过期，过期才删除
    pub fn remove_if_expired(&self, key: &str) -> bool {
        self.data
            .remove_if(key, |_, entry| entry.is_expired(Instant::now()))
            .is_some()
    }

    /// 原始条目数（可能包含尚未清理的过期条目）
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
