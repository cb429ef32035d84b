//! HTTP 接口层

mod forms;
mod routes;

pub use forms::{CasePath, CreateCaseForm, CreatePaymentForm, ValidForm};
pub use routes::{AppState, router};
