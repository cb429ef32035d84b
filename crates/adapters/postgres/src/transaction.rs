//! PostgreSQL 事务管理模块

use docket_errors::{AppError, AppResult};
use sqlx::{PgConnection, Postgres, Transaction};

/// 事务管理器
///
/// 在调用方持有的单个连接上开启事务，事务未提交即被丢弃时自动回滚
pub struct TransactionManager;

impl TransactionManager {
    /// 开始事务
    pub async fn begin(conn: &mut PgConnection) -> AppResult<Transaction<'_, Postgres>> {
        sqlx::Connection::begin(conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))
    }

    /// 提交事务
    pub async fn commit(tx: Transaction<'_, Postgres>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))
    }

    /// 回滚事务
    pub async fn rollback(tx: Transaction<'_, Postgres>) -> AppResult<()> {
        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))
    }
}
