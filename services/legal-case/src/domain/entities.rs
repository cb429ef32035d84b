//! 案件、付款与律师分配记录

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

int_id!(
    /// 客户 ID
    ClientId
);
int_id!(
    /// 案件 ID
    CaseId
);
int_id!(
    /// 付款 ID
    PaymentId
);

/// 案件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Case {
    pub case_id: CaseId,
    pub case_name: String,
    pub case_description: String,
    pub client_id: ClientId,
}

/// 案件及其客户名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseWithClient {
    #[serde(flatten)]
    pub case: Case,
    pub client_name: String,
}

/// 付款记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub payment_id: PaymentId,
    pub case_id: CaseId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}

/// 律师分配记录
///
/// 列结构由外部维护，这里按列名保存原始值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseAssignment {
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// 案件详情页所需的全部数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOverview {
    pub case: CaseWithClient,
    pub payments: Vec<Payment>,
    pub assignments: Vec<CaseAssignment>,
}

/// 待创建的案件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCase {
    pub case_name: String,
    pub case_description: String,
    pub client_id: ClientId,
}

/// 待登记的付款
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub case_id: CaseId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}

/// 带引用检查的写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome<T> {
    /// 写入成功，返回新记录的 ID
    Inserted(T),
    /// 引用的记录不存在，未写入
    ReferenceMissing,
}
