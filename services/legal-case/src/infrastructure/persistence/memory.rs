//! 内存案件仓储（用于开发和测试）

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use docket_config::PaymentCasePolicy;
use docket_errors::{AppError, AppResult};
use tokio::sync::RwLock;

use crate::domain::{
    Case, CaseAssignment, CaseId, CaseOverview, CaseRepository, CaseWithClient, ClientId,
    InsertOutcome, NewCase, NewPayment, Payment, PaymentId,
};

#[derive(Default)]
struct MemoryState {
    clients: HashMap<ClientId, String>,
    cases: Vec<Case>,
    payments: Vec<Payment>,
    assignments: Vec<(CaseId, CaseAssignment)>,
    next_case_id: i32,
    next_payment_id: i32,
}

/// 内存案件仓储
///
/// 与 PostgreSQL 实现保持相同语义：按插入顺序返回，ID 从 1 开始递增
#[derive(Default)]
pub struct InMemoryCaseRepository {
    state: RwLock<MemoryState>,
    unavailable: AtomicBool,
}

impl InMemoryCaseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置客户
    pub async fn add_client(&self, client_id: ClientId, name: impl Into<String>) {
        self.state.write().await.clients.insert(client_id, name.into());
    }

    /// 预置律师分配记录
    pub async fn add_assignment(
        &self,
        case_id: CaseId,
        mut attributes: serde_json::Map<String, serde_json::Value>,
    ) {
        attributes.insert("case_id".to_string(), serde_json::Value::from(case_id.0));
        self.state
            .write()
            .await
            .assignments
            .push((case_id, CaseAssignment { attributes }));
    }

    pub async fn case_count(&self) -> usize {
        self.state.read().await.cases.len()
    }

    pub async fn payment_count(&self) -> usize {
        self.state.read().await.payments.len()
    }

    /// 模拟存储不可用，之后所有操作返回数据库错误
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::database("In-memory store marked unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl CaseRepository for InMemoryCaseRepository {
    async fn list_cases(&self) -> AppResult<Vec<Case>> {
        self.check_available()?;
        Ok(self.state.read().await.cases.clone())
    }

    async fn find_case_overview(&self, case_id: CaseId) -> AppResult<Option<CaseOverview>> {
        self.check_available()?;
        let state = self.state.read().await;

        // 与 JOIN 语义一致：客户缺失时同样视为找不到
        let Some(case) = state.cases.iter().find(|c| c.case_id == case_id) else {
            return Ok(None);
        };
        let Some(client_name) = state.clients.get(&case.client_id) else {
            return Ok(None);
        };

        Ok(Some(CaseOverview {
            case: CaseWithClient {
                case: case.clone(),
                client_name: client_name.clone(),
            },
            payments: state
                .payments
                .iter()
                .filter(|p| p.case_id == case_id)
                .cloned()
                .collect(),
            assignments: state
                .assignments
                .iter()
                .filter(|(id, _)| *id == case_id)
                .map(|(_, a)| a.clone())
                .collect(),
        }))
    }

    async fn find_case(&self, case_id: CaseId) -> AppResult<Option<Case>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state.cases.iter().find(|c| c.case_id == case_id).cloned())
    }

    async fn create_case(&self, new_case: &NewCase) -> AppResult<InsertOutcome<CaseId>> {
        self.check_available()?;
        let mut state = self.state.write().await;

        if !state.clients.contains_key(&new_case.client_id) {
            return Ok(InsertOutcome::ReferenceMissing);
        }

        state.next_case_id += 1;
        let case_id = CaseId(state.next_case_id);
        state.cases.push(Case {
            case_id,
            case_name: new_case.case_name.clone(),
            case_description: new_case.case_description.clone(),
            client_id: new_case.client_id,
        });

        Ok(InsertOutcome::Inserted(case_id))
    }

    async fn record_payment(
        &self,
        payment: &NewPayment,
        policy: PaymentCasePolicy,
    ) -> AppResult<InsertOutcome<PaymentId>> {
        self.check_available()?;
        let mut state = self.state.write().await;

        if policy == PaymentCasePolicy::RequireExistingCase
            && !state.cases.iter().any(|c| c.case_id == payment.case_id)
        {
            return Ok(InsertOutcome::ReferenceMissing);
        }

        state.next_payment_id += 1;
        let payment_id = PaymentId(state.next_payment_id);
        state.payments.push(Payment {
            payment_id,
            case_id: payment.case_id,
            amount: payment.amount,
            payment_date: payment.payment_date,
        });

        Ok(InsertOutcome::Inserted(payment_id))
    }
}
