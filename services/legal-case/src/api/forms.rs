//! 请求参数
//!
//! 每个写操作对应一个强类型表单，缺失或类型错误的字段在进入数据访问前被拒绝

use axum::extract::{Form, FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use chrono::NaiveDate;
use docket_errors::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{CaseId, ClientId, NewCase, NewPayment};

/// 创建案件表单
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCaseForm {
    pub case_name: String,
    pub case_description: String,
    pub client_id: i32,
}

impl From<CreateCaseForm> for NewCase {
    fn from(form: CreateCaseForm) -> Self {
        Self {
            case_name: form.case_name,
            case_description: form.case_description,
            client_id: ClientId(form.client_id),
        }
    }
}

/// 登记付款表单
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentForm {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}

impl CreatePaymentForm {
    pub fn into_payment(self, case_id: CaseId) -> NewPayment {
        NewPayment {
            case_id,
            amount: self.amount,
            payment_date: self.payment_date,
        }
    }
}

/// 表单提取器，解析失败时返回 400 纯文本
pub struct ValidForm<T>(pub T);

impl<S, T> FromRequest<S> for ValidForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// 路径中的案件 ID
pub struct CasePath(pub CaseId);

impl<S> FromRequestParts<S> for CasePath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(case_id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self(CaseId(case_id)))
    }
}
