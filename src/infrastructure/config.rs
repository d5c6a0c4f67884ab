//! 配置基础设施

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件搜索路径
pub const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 存储配置
    pub database: DatabaseConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    /// 数据库连接串，postgres 后端必填
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5136,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            max_connections: 20,
            min_connections: 5,
            acquire_timeout_seconds: 8,
        }
    }
}

impl HttpConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl AppConfig {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 用环境变量覆盖配置项
    pub fn apply_env_overrides(&mut self, database_url: Option<String>) {
        if let Some(url) = database_url.filter(|u| !u.trim().is_empty()) {
            self.database.url = Some(url);
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证HTTP配置
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        // 验证存储配置
        let db = &self.database;
        if db.backend == StoreBackend::Postgres && db.url.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Validation(
                "postgres 后端需要配置 database.url 或 DATABASE_URL".to_string(),
            ));
        }
        if db.min_connections > db.max_connections {
            return Err(ConfigError::Validation(format!(
                "最小连接数 {} 不能大于最大连接数 {}",
                db.min_connections, db.max_connections
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
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 从文件或默认值加载配置，并应用环境变量
///
/// 返回值中的路径为实际使用的配置文件，`None` 表示使用默认配置。
pub fn load_config() -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    let found = CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists());

    let mut config = match &found {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    config.apply_env_overrides(std::env::var("DATABASE_URL").ok());
    config.validate()?;

    Ok((config, found))
}
