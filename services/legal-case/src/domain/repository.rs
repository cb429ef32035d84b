//! 案件仓储接口

use async_trait::async_trait;
use docket_config::PaymentCasePolicy;
use docket_errors::AppResult;

use super::entities::{
    Case, CaseId, CaseOverview, InsertOutcome, NewCase, NewPayment, PaymentId,
};

/// 案件仓储接口
///
/// 每个方法对应一次请求，实现方在方法内只占用一个数据库连接，返回前释放
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// 列出全部案件（存储默认顺序）
    async fn list_cases(&self) -> AppResult<Vec<Case>>;

    /// 查询案件详情：案件、客户名称、付款与律师分配
    ///
    /// 案件不存在时返回 `None`，不再查询付款与分配
    async fn find_case_overview(&self, case_id: CaseId) -> AppResult<Option<CaseOverview>>;

    /// 根据 ID 查找案件
    async fn find_case(&self, case_id: CaseId) -> AppResult<Option<Case>>;

    /// 创建案件
    ///
    /// 客户检查与插入在同一事务中完成，客户不存在时返回 `ReferenceMissing`
    async fn create_case(&self, new_case: &NewCase) -> AppResult<InsertOutcome<CaseId>>;

    /// 登记付款
    ///
    /// `Lenient` 策略下不检查案件；`RequireExistingCase` 策略下案件不存在时返回 `ReferenceMissing`
    async fn record_payment(
        &self,
        payment: &NewPayment,
        policy: PaymentCasePolicy,
    ) -> AppResult<InsertOutcome<PaymentId>>;
}
