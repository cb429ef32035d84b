//! 领域层

pub mod entities;
pub mod repository;

pub use entities::*;
pub use repository::*;
