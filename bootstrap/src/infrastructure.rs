//! 基础设施资源管理
//!
//! 统一管理服务共享的基础设施资源

use std::sync::Arc;
use std::time::Duration;

pub use docket_adapter_postgres::PoolStatus;
use docket_adapter_postgres::{PostgresConfig, SslMode, create_pool};
use docket_config::{AppConfig, DatabaseSslMode};
use docket_errors::AppResult;
use secrecy::ExposeSecret;
use sqlx::PgPool;

/// 基础设施资源容器
///
/// 克隆成本很低：配置在 `Arc` 中，`PgPool` 本身是引用计数句柄
#[derive(Clone)]
pub struct Infrastructure {
    /// 应用配置
    config: Arc<AppConfig>,
    /// PostgreSQL 连接池
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let pg_config = postgres_config(&config);
        let postgres_pool = create_pool(&pg_config).await?;

        Ok(Self::new(config, postgres_pool))
    }

    /// 使用已有的连接池创建（用于测试）
    pub fn new(config: AppConfig, postgres_pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            postgres_pool,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn postgres_pool_status(&self) -> PoolStatus {
        PoolStatus::of(&self.postgres_pool)
    }
}

/// 将应用配置映射为 PostgreSQL 适配器配置
pub fn postgres_config(config: &AppConfig) -> PostgresConfig {
    let db = &config.database;
    PostgresConfig::from_components(&db.host, db.port, &db.name, &db.user)
        .with_password(db.password.expose_secret())
        .with_ssl_mode(ssl_mode(db.ssl_mode))
        .with_pool(0, db.max_connections)
        .with_acquire_timeout(Duration::from_secs(db.acquire_timeout_secs))
        .with_application_name(&config.app_name)
}

fn ssl_mode(mode: DatabaseSslMode) -> SslMode {
    match mode {
        DatabaseSslMode::Disable => SslMode::Disable,
        DatabaseSslMode::Prefer => SslMode::Prefer,
        DatabaseSslMode::Require => SslMode::Require,
    }
}
