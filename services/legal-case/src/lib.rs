//! Legal Case Service
//!
//! 案件列表、案件详情（付款与律师分配）、新建案件与登记付款

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod views;
