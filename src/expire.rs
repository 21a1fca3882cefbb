// src/expire.rs

//! 过期策略
//!
//! - 惰性过期：`Keyspace` 的每条读路径自己检查并删除过期 key；
//! - 主动过期：[`Reaper`] 后台定时扫描，只是回收内存的优化，
//!   TTL 语义的正确性不依赖它是否运行。

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, trace};

use crate::engine::Keyspace;

/// 默认清理周期（秒）
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 20;

/// TTL 上限（约 100 年），更大的值按上限截断
pub const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// 设置 key 的过期时间
///
/// `ttl_secs <= 0` 表示立即过期（下次访问即视为不存在）。
/// 返回 false 表示 key 不存在。
pub fn expire(ks: &Keyspace, key: &str, ttl_secs: i64) -> bool {
    trace!(key, ttl_secs, "EXPIRE");
    let now = Instant::now();
    let deadline = match u64::try_from(ttl_secs) {
        Ok(secs) if secs > 0 => now.checked_add(Duration::from_secs(secs.min(MAX_TTL_SECS))),
        _ => Some(now),
    };
    ks.mutate(key, |slot| match slot {
        Some(entry) => {
            // 截断后仍无法表示时保留原有截止时间，只有 SET 能清除 TTL
            entry.expires_at = deadline.or(entry.expires_at);
            true
        }
        None => false,
    })
}

/// 扫描一遍 keyspace，删除所有已过期的 key，返回删除数量
///
/// 先取过期 key 的快照，再逐个走单 key 的加锁删除路径，
/// 整个过程不持有全局锁。删除前会在锁内再次检查，期间被 SET / EXPIRE
/// 刷新过的 key 会被跳过。
pub fn sweep(ks: &Keyspace) -> usize {
    ks.expired_keys()
        .iter()
        .filter(|key| ks.remove_if_expired(key))
        .count()
}

/// 后台定时清理任务
///
/// 由构造 `Keyspace` 的一方显式启动和停止；`Reaper` 被 drop 时也会发出停止信号。
pub struct Reaper {
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl Reaper {
    /// 在当前 tokio runtime 上启动清理任务
    ///
    /// # Panics
    /// 不在 tokio runtime 中调用时 panic（`tokio::spawn` 的要求）
    pub fn start(ks: Arc<Keyspace>, every: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(ks, every, shutdown_rx));
        info!(interval_secs = every.as_secs_f64(), "expiration reaper started");
        Reaper { shutdown_tx, handle: Some(handle) }
    }

    /// 发出停止信号并等待任务退出
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("expiration reaper stopped");
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

async fn run(ks: Arc<Keyspace>, every: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    let mut iv = interval(every);
    iv.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // 第一次 tick 立即返回，跳过
    iv.tick().await;

    loop {
        tokio::select! {
            _ = iv.tick() => {
                let removed = sweep(&ks);
                debug!(removed, remaining = ks.len(), "expiration sweep finished");
            }
            changed = shutdown_rx.changed() => {
                // 发送端已经不存在同样视为停止
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
}
