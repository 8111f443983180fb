//! 配置加载
//!
//! 配置来自 TOML 文件，缺失的段落或字段使用默认值，
//! 随后由环境变量 `PORT`、`DATABASE_URL` 覆盖。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 默认的配置文件搜索路径
pub const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 服务配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 存储配置
    pub store: StoreConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 客户端配置
    pub client: ClientConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 存储后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// 进程内存储，重启后数据丢失
    #[default]
    Memory,
    /// PostgreSQL（需要 `database` 特性）
    Postgres,
}

/// 存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// 数据库连接串，postgres 后端必填
    pub database_url: Option<String>,
    /// 连接池最大连接数
    pub max_connections: u32,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 日志目录，为空时不写文件
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
    /// 是否启用控制台输出
    pub console_output: bool,
}

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 服务端地址，例如 `http://localhost:5000`
    pub base_url: String,
    /// 单次请求超时（秒）
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            timeout_seconds: 30,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: "catalog".to_string(),
            console_output: true,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::FileWrite(e.to_string()))?;
        }

        fs::write(path.as_ref(), content).map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// 用查找函数覆盖配置项，`lookup` 通常是环境变量
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.http.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("无效的端口: {}", port)))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.store.database_url = Some(url);
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时必须大于0".to_string()));
        }

        if self.store.backend == StoreBackend::Postgres {
            match &self.store.database_url {
                Some(url) if !url.is_empty() => {}
                _ => {
                    return Err(ConfigError::Validation(
                        "postgres 后端需要 database_url".to_string(),
                    ))
                }
            }
        }
        if self.store.max_connections == 0 {
            return Err(ConfigError::Validation("最大连接数必须大于0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let base_url = &self.client.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "客户端地址必须以 http:// 或 https:// 开头: {}",
                base_url
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("文件写入错误: {0}")]
    FileWrite(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置序列化错误: {0}")]
    Serialize(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 加载配置：指定路径优先，其次搜索默认路径，最后使用默认值；
/// 之后应用环境变量覆盖并验证。
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => Config::load_from_file(path)?,
        None => match CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(found) => {
                info!("从配置文件加载: {}", found);
                Config::load_from_file(found)?
            }
            None => {
                info!("未找到配置文件，使用默认配置");
                Config::default()
            }
        },
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}
