// src/config.rs

use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::{IpAddr, SocketAddr},
    path::Path,
    time::Duration,
};
use anyhow::{Context, Result, bail};
use tracing::info;

use crate::expire::DEFAULT_SWEEP_INTERVAL_SECS;

/// 进程启动后，从配置文件（及命令行覆盖）得到的全局配置
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// 监听地址
    pub host: String,
    /// HTTP 监听端口
    pub port: u16,
    /// 后台过期清理周期（秒）
    pub sweep_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl Config {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid listen host {:?}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// 启动前的合法性检查
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval_secs == 0 {
            bail!("sweep_interval_secs must be greater than 0");
        }
        self.addr()?;
        Ok(())
    }
}

/// 从指定路径读取并反序列化 JSON 配置
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();

    // 如果配置文件不存在，创建默认配置
    if !path_ref.exists() {
        info!(path = %path_ref.display(), "config file not found, creating default configuration");

        let default_cfg = Config::default();
        let default_json = serde_json::to_string_pretty(&default_cfg)?;
        fs::write(path_ref, default_json)
            .with_context(|| format!("Failed to write default config {:?}", path_ref))?;

        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read config file {:?}", path_ref))?;
    let cfg: Config = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse {:?}", path_ref))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_writes_default() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("config.json");

        let cfg = load(&path)?;
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        // 再读一次得到相同内容
        assert_eq!(load(&path)?, cfg);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{ "port": 9000 }"#)?;

        let cfg = load(&path)?;
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.sweep_interval(), Duration::from_secs(20));
        Ok(())
    }

    #[test]
    fn test_bad_json_is_an_error() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("config.json");
        fs::write(&path, "not json")?;
        assert!(load(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_validate() {
        let mut cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.addr().unwrap(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());

        cfg.sweep_interval_secs = 0;
        assert!(cfg.validate().is_err());

        cfg.sweep_interval_secs = 5;
        cfg.host = "not-an-ip".into();
        assert!(cfg.validate().is_err());
    }
}
