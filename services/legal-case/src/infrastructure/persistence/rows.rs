//! 数据库行结构

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::types::Json;

use crate::domain::{Case, CaseAssignment, CaseId, CaseWithClient, ClientId, Payment, PaymentId};

#[derive(sqlx::FromRow)]
pub struct CaseRow {
    pub case_id: i32,
    pub case_name: String,
    pub case_description: String,
    pub client_id: i32,
}

impl From<CaseRow> for Case {
    fn from(row: CaseRow) -> Self {
        Self {
            case_id: CaseId(row.case_id),
            case_name: row.case_name,
            case_description: row.case_description,
            client_id: ClientId(row.client_id),
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct CaseWithClientRow {
    pub case_id: i32,
    pub case_name: String,
    pub case_description: String,
    pub client_id: i32,
    pub client_name: String,
}

impl From<CaseWithClientRow> for CaseWithClient {
    fn from(row: CaseWithClientRow) -> Self {
        Self {
            case: Case {
                case_id: CaseId(row.case_id),
                case_name: row.case_name,
                case_description: row.case_description,
                client_id: ClientId(row.client_id),
            },
            client_name: row.client_name,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct PaymentRow {
    pub payment_id: i32,
    pub case_id: i32,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            payment_id: PaymentId(row.payment_id),
            case_id: CaseId(row.case_id),
            amount: row.amount,
            payment_date: row.payment_date,
        }
    }
}

/// 整行以 JSONB 读出，不依赖 case_assignments 的具体列
#[derive(sqlx::FromRow)]
pub struct CaseAssignmentRow {
    pub attributes: Json<serde_json::Map<String, serde_json::Value>>,
}

impl From<CaseAssignmentRow> for CaseAssignment {
    fn from(row: CaseAssignmentRow) -> Self {
        Self {
            attributes: row.attributes.0,
        }
    }
}
