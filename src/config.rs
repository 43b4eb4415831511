//! Application configuration module / 应用配置模块
//!
//! Loaded from config.json in the working directory, created with defaults on
//! first run. Environment variables override file values / 环境变量优先于配置文件:
//! `APP_HOST`, `APP_PORT`, `DATABASE_URL`, `SEARCH_FULL_TEXT`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    pub server: ServerConfig,
    /// Database configuration / 数据库配置
    pub database: DatabaseConfig,
    /// Search configuration / 搜索配置
    pub search: SearchConfig,
    /// Demo data seeding / 演示数据
    pub seed: SeedConfig,
    /// Background mutation logging / 后台变更日志
    pub telemetry: TelemetryConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration / 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Data directory path / 数据目录路径
    pub data_dir: String,
    /// Database file name, relative to data_dir / 数据库文件名
    pub db_file: String,
    pub max_connections: u32,
    /// Full URL, takes precedence over data_dir/db_file when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maintain the FTS5 index and try it before pattern matching
    pub full_text: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    /// Multiplier for the synthetic delay, 0 disables it
    pub delay_scale: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "books.db".to_string(),
            max_connections: 5,
            url: None,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { enabled: true, delay_scale: 1.0 }
    }
}

impl AppConfig {
    /// Get the full database URL / 获取完整的数据库URL
    pub fn get_database_url(&self) -> String {
        if let Some(url) = &self.database.url {
            return url.clone();
        }
        let db_path = Path::new(&self.database.data_dir).join(&self.database.db_file);
        format!("sqlite:{}?mode=rwc", db_path.to_string_lossy())
    }

    /// Data directory, None when an explicit URL is configured
    pub fn get_data_dir(&self) -> Option<PathBuf> {
        match self.database.url {
            Some(_) => None,
            None => Some(PathBuf::from(&self.database.data_dir)),
        }
    }

    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply environment overrides through the given lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("APP_HOST").filter(|v| !v.is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("APP_PORT").filter(|v| !v.is_empty()) {
            self.server.port = port
                .parse()
                .with_context(|| format!("APP_PORT is not a valid port: {}", port))?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(flag) = lookup("SEARCH_FULL_TEXT").filter(|v| !v.is_empty()) {
            self.search.full_text = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        Ok(())
    }
}

/// Get the config file path / 获取配置文件路径
pub fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file {:?}", config_path))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {:?}", config_path))?;
        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Load config.json from the working directory and apply env overrides
pub fn load_config() -> Result<AppConfig> {
    let mut config = load_config_from(&get_config_path())?;
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(config: &AppConfig, config_path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(config_path, content)
        .with_context(|| format!("failed to write config file {:?}", config_path))?;
    Ok(())
}
