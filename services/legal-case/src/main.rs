//! Legal Case Service

use std::sync::Arc;

use docket_bootstrap::run_http;
use legal_case::api::{AppState, router};
use legal_case::application::CaseService;
use legal_case::infrastructure::persistence::PostgresCaseRepository;
use legal_case::views::Views;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = std::env::var("DOCKET_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    run_http(&config_dir, |infra| async move {
        let config = infra.config();
        let repo = Arc::new(PostgresCaseRepository::new(infra.postgres_pool()));
        let service = CaseService::new(repo, config.payments.case_policy);
        let views = Views::from_config(&config.views)?;

        Ok(router(AppState::new(service, views)))
    })
    .await
}
