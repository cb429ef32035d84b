//! docket-adapter-postgres - PostgreSQL 适配器

mod config;
mod connection;
mod transaction;

pub use config::*;
pub use connection::*;
pub use transaction::*;
