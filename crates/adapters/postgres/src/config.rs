//! PostgreSQL 配置模块
//!
//! 连接参数以组件形式保存，不拼接包含密码的 URL

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::time::Duration;

/// SSL 模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    /// 禁用 SSL
    Disable,
    /// 允许 SSL（如果服务器支持）
    #[default]
    Prefer,
    /// 要求 SSL
    Require,
}

impl SslMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
        }
    }

    fn to_pg(self) -> PgSslMode {
        match self {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
        }
    }
}

/// PostgreSQL 配置
#[derive(Clone)]
pub struct PostgresConfig {
    /// 主机
    pub host: String,
    /// 端口
    pub port: u16,
    /// 数据库名
    pub database: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: Option<String>,
    /// SSL 模式
    pub ssl_mode: SslMode,
    /// 最小连接数
    pub pool_min: u32,
    /// 最大连接数
    pub pool_max: u32,
    /// 获取连接超时
    pub acquire_timeout: Duration,
    /// 空闲超时
    pub idle_timeout: Duration,
    /// 应用名称（用于连接标识）
    pub application_name: Option<String>,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            username: "postgres".to_string(),
            password: None,
            ssl_mode: SslMode::default(),
            pool_min: 0,
            pool_max: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            application_name: None,
        }
    }
}

// 手写 Debug，避免密码出现在日志中
impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("url", &self.display_url())
            .field("ssl_mode", &self.ssl_mode)
            .field("pool_min", &self.pool_min)
            .field("pool_max", &self.pool_max)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("application_name", &self.application_name)
            .finish()
    }
}

impl PostgresConfig {
    /// 从组件创建配置
    pub fn from_components(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    /// 设置密码
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// 设置 SSL 模式
    pub fn with_ssl_mode(mut self, mode: SslMode) -> Self {
        self.ssl_mode = mode;
        self
    }

    /// 设置连接池配置
    pub fn with_pool(mut self, min: u32, max: u32) -> Self {
        self.pool_min = min;
        self.pool_max = max;
        self
    }

    /// 设置获取连接超时
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// 设置应用名称
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// 用于日志输出的连接地址（不含密码）
    pub fn display_url(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}?sslmode={}",
            self.username,
            self.host,
            self.port,
            self.database,
            self.ssl_mode.as_str()
        )
    }

    /// 构建 sqlx 连接参数
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .ssl_mode(self.ssl_mode.to_pg());

        if let Some(ref password) = self.password {
            options = options.password(password);
        }

        if let Some(ref app_name) = self.application_name {
            options = options.application_name(app_name);
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PostgresConfig::default();
        assert_eq!(config.pool_min, 0);
        assert_eq!(config.pool_max, 5);
        assert_eq!(config.ssl_mode, SslMode::Prefer);
        assert_eq!(config.port, 5432);
    }

    #[test]
    fn test_config_from_components() {
        let config = PostgresConfig::from_components("db.example.com", 5433, "docket", "admin")
            .with_password("secret")
            .with_pool(1, 20)
            .with_application_name("legal-case");

        assert_eq!(config.host, "db.example.com");
        assert_eq!(config.port, 5433);
        assert_eq!(config.database, "docket");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, Some("secret".to_string()));
        assert_eq!(config.pool_max, 20);
        assert_eq!(config.application_name, Some("legal-case".to_string()));
    }

    #[test]
    fn test_display_url_hides_password() {
        let config = PostgresConfig::from_components("localhost", 5432, "docket", "docket")
            .with_password("p@ss/word")
            .with_ssl_mode(SslMode::Disable);

        let url = config.display_url();
        assert_eq!(url, "postgres://docket@localhost:5432/docket?sslmode=disable");
        assert!(!format!("{:?}", config).contains("p@ss/word"));
    }

    #[test]
    fn test_connect_options() {
        let options = PostgresConfig::from_components("db", 6543, "docket", "clerk")
            .with_password("secret")
            .connect_options();

        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("docket"));
        assert_eq!(options.get_username(), "clerk");
    }

    #[test]
    fn test_ssl_mode() {
        assert_eq!(SslMode::Disable.as_str(), "disable");
        assert_eq!(SslMode::Prefer.as_str(), "prefer");
        assert_eq!(SslMode::Require.as_str(), "require");
    }
}
