//! PostgreSQL 案件仓储实现

use async_trait::async_trait;
use docket_adapter_postgres::TransactionManager;
use docket_config::PaymentCasePolicy;
use docket_errors::{AppError, AppResult};
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tracing::debug;

use crate::domain::{
    Case, CaseAssignment, CaseId, CaseOverview, CaseRepository, InsertOutcome, NewCase, NewPayment,
    Payment, PaymentId,
};

use super::rows::{CaseAssignmentRow, CaseRow, CaseWithClientRow, PaymentRow};

pub struct PostgresCaseRepository {
    pool: PgPool,
}

impl PostgresCaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取本次请求使用的连接，drop 时归还
    async fn acquire(&self) -> AppResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {}", e)))
    }
}

#[async_trait]
impl CaseRepository for PostgresCaseRepository {
    async fn list_cases(&self) -> AppResult<Vec<Case>> {
        let mut conn = self.acquire().await?;

        let rows = sqlx::query_as::<_, CaseRow>(
            r#"
            SELECT case_id, case_name, case_description, client_id
            FROM cases
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to list cases: {}", e)))?;

        Ok(rows.into_iter().map(Case::from).collect())
    }

    async fn find_case_overview(&self, case_id: CaseId) -> AppResult<Option<CaseOverview>> {
        debug!(%case_id, "Finding case overview");

        let mut conn = self.acquire().await?;

        let row = sqlx::query_as::<_, CaseWithClientRow>(
            r#"
            SELECT c.case_id, c.case_name, c.case_description, c.client_id,
                   cl.name AS client_name
            FROM cases c
            JOIN clients cl ON c.client_id = cl.client_id
            WHERE c.case_id = $1
            "#,
        )
        .bind(case_id.0)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to find case: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payments = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT payment_id, case_id, amount, payment_date
            FROM payments
            WHERE case_id = $1
            "#,
        )
        .bind(case_id.0)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to list payments: {}", e)))?;

        let assignments = sqlx::query_as::<_, CaseAssignmentRow>(
            r#"
            SELECT to_jsonb(ca) AS attributes
            FROM case_assignments ca
            WHERE ca.case_id = $1
            "#,
        )
        .bind(case_id.0)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to list case assignments: {}", e)))?;

        Ok(Some(CaseOverview {
            case: row.into(),
            payments: payments.into_iter().map(Payment::from).collect(),
            assignments: assignments.into_iter().map(CaseAssignment::from).collect(),
        }))
    }

    async fn find_case(&self, case_id: CaseId) -> AppResult<Option<Case>> {
        let mut conn = self.acquire().await?;

        let row = sqlx::query_as::<_, CaseRow>(
            r#"
            SELECT case_id, case_name, case_description, client_id
            FROM cases
            WHERE case_id = $1
            "#,
        )
        .bind(case_id.0)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to find case: {}", e)))?;

        Ok(row.map(Case::from))
    }

    async fn create_case(&self, new_case: &NewCase) -> AppResult<InsertOutcome<CaseId>> {
        debug!(client_id = %new_case.client_id, "Creating case");

        let mut conn = self.acquire().await?;
        let mut tx = TransactionManager::begin(&mut *conn).await?;

        // FOR SHARE：提交前客户行不会被删除
        let client = sqlx::query_scalar::<_, i32>(
            "SELECT client_id FROM clients WHERE client_id = $1 FOR SHARE",
        )
        .bind(new_case.client_id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to find client: {}", e)))?;

        if client.is_none() {
            TransactionManager::rollback(tx).await?;
            return Ok(InsertOutcome::ReferenceMissing);
        }

        let case_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO cases (case_name, case_description, client_id)
            VALUES ($1, $2, $3)
            RETURNING case_id
            "#,
        )
        .bind(&new_case.case_name)
        .bind(&new_case.case_description)
        .bind(new_case.client_id.0)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert case: {}", e)))?;

        TransactionManager::commit(tx).await?;

        Ok(InsertOutcome::Inserted(CaseId(case_id)))
    }

    async fn record_payment(
        &self,
        payment: &NewPayment,
        policy: PaymentCasePolicy,
    ) -> AppResult<InsertOutcome<PaymentId>> {
        debug!(case_id = %payment.case_id, ?policy, "Recording payment");

        let mut conn = self.acquire().await?;
        let mut tx = TransactionManager::begin(&mut *conn).await?;

        if policy == PaymentCasePolicy::RequireExistingCase {
            let case = sqlx::query_scalar::<_, i32>(
                "SELECT case_id FROM cases WHERE case_id = $1 FOR SHARE",
            )
            .bind(payment.case_id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to find case: {}", e)))?;

            if case.is_none() {
                TransactionManager::rollback(tx).await?;
                return Ok(InsertOutcome::ReferenceMissing);
            }
        }

        let payment_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO payments (case_id, amount, payment_date)
            VALUES ($1, $2, $3)
            RETURNING payment_id
            "#,
        )
        .bind(payment.case_id.0)
        .bind(payment.amount)
        .bind(payment.payment_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert payment: {}", e)))?;

        TransactionManager::commit(tx).await?;

        Ok(InsertOutcome::Inserted(PaymentId(payment_id)))
    }
}
