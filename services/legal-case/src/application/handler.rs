//! Business logic handler

use std::sync::Arc;

use docket_config::PaymentCasePolicy;
use docket_errors::{AppError, AppResult};
use metrics::counter;
use tracing::{info, warn};

use crate::domain::{
    Case, CaseId, CaseOverview, CaseRepository, InsertOutcome, NewCase, NewPayment, PaymentId,
};

pub const CASE_NOT_FOUND: &str = "Case not found!";
pub const CLIENT_NOT_FOUND: &str = "Client not found!";

pub struct CaseService {
    repo: Arc<dyn CaseRepository>,
    payment_policy: PaymentCasePolicy,
}

impl CaseService {
    pub fn new(repo: Arc<dyn CaseRepository>, payment_policy: PaymentCasePolicy) -> Self {
        Self {
            repo,
            payment_policy,
        }
    }

    pub fn payment_policy(&self) -> PaymentCasePolicy {
        self.payment_policy
    }

    /// 列出全部案件
    pub async fn list_cases(&self) -> AppResult<Vec<Case>> {
        self.repo.list_cases().await
    }

    /// 案件详情
    pub async fn case_detail(&self, case_id: CaseId) -> AppResult<CaseOverview> {
        match self.repo.find_case_overview(case_id).await? {
            Some(overview) => Ok(overview),
            None => {
                counter!("not_found_total", "entity" => "case").increment(1);
                Err(AppError::not_found(CASE_NOT_FOUND))
            }
        }
    }

    /// 付款表单所属的案件
    ///
    /// 不做存在性检查，案件不存在时表单以空案件渲染
    pub async fn payment_form_case(&self, case_id: CaseId) -> AppResult<Option<Case>> {
        self.repo.find_case(case_id).await
    }

    /// 创建案件
    pub async fn create_case(&self, new_case: NewCase) -> AppResult<CaseId> {
        match self.repo.create_case(&new_case).await? {
            InsertOutcome::Inserted(case_id) => {
                counter!("cases_created_total").increment(1);
                info!(%case_id, client_id = %new_case.client_id, "Case created");
                Ok(case_id)
            }
            InsertOutcome::ReferenceMissing => {
                counter!("not_found_total", "entity" => "client").increment(1);
                warn!(client_id = %new_case.client_id, "Case rejected, client does not exist");
                Err(AppError::not_found(CLIENT_NOT_FOUND))
            }
        }
    }

    /// 登记付款
    pub async fn record_payment(&self, payment: NewPayment) -> AppResult<PaymentId> {
        match self.repo.record_payment(&payment, self.payment_policy).await? {
            InsertOutcome::Inserted(payment_id) => {
                counter!("payments_recorded_total").increment(1);
                info!(
                    %payment_id,
                    case_id = %payment.case_id,
                    amount = %payment.amount,
                    "Payment recorded"
                );
                Ok(payment_id)
            }
            InsertOutcome::ReferenceMissing => {
                counter!("not_found_total", "entity" => "case").increment(1);
                warn!(case_id = %payment.case_id, "Payment rejected, case does not exist");
                Err(AppError::not_found(CASE_NOT_FOUND))
            }
        }
    }
}
