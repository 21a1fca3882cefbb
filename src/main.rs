// src/main.rs
use std::path::PathBuf;

use clap::Parser;
use crab_cache::{config, server};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 内存键值缓存服务（HTTP/JSON）
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON 配置文件路径，不存在时自动生成默认配置
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 覆盖监听地址
    #[arg(long)]
    host: Option<String>,

    /// 覆盖监听端口
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// 覆盖后台过期清理周期（秒）
    #[arg(long, value_name = "SECS")]
    sweep_interval: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crab_cache=info,warp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(&cli.config)?;
    if let Some(host) = cli.host {
        cfg.host = host;
    }
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    if let Some(secs) = cli.sweep_interval {
        cfg.sweep_interval_secs = secs;
    }

    server::serve(cfg).await?;
    Ok(())
}
