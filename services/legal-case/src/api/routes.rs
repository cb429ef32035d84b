//! 路由与请求处理

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
};
use docket_errors::AppResult;

use super::forms::{CasePath, CreateCaseForm, CreatePaymentForm, ValidForm};
use crate::application::CaseService;
use crate::views::Views;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CaseService>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(service: CaseService, views: Views) -> Self {
        Self {
            service: Arc::new(service),
            views: Arc::new(views),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_cases))
        .route("/case/{case_id}", get(case_detail))
        .route("/add_case", get(add_case_form).post(create_case))
        .route("/add_payment_form/{case_id}", get(add_payment_form))
        .route("/add_payment/{case_id}", post(create_payment))
        .with_state(state)
}

async fn list_cases(State(state): State<AppState>) -> AppResult<Html<String>> {
    let cases = state.service.list_cases().await?;
    Ok(Html(state.views.case_list(&cases)?))
}

async fn case_detail(
    State(state): State<AppState>,
    CasePath(case_id): CasePath,
) -> AppResult<Html<String>> {
    let overview = state.service.case_detail(case_id).await?;
    Ok(Html(state.views.case_detail(&overview)?))
}

async fn add_case_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.views.add_case_form()?))
}

async fn create_case(
    State(state): State<AppState>,
    ValidForm(form): ValidForm<CreateCaseForm>,
) -> AppResult<Redirect> {
    state.service.create_case(form.into()).await?;
    Ok(Redirect::to("/"))
}

async fn add_payment_form(
    State(state): State<AppState>,
    CasePath(case_id): CasePath,
) -> AppResult<Html<String>> {
    let case = state.service.payment_form_case(case_id).await?;
    Ok(Html(state.views.add_payment_form(case_id, case.as_ref())?))
}

async fn create_payment(
    State(state): State<AppState>,
    CasePath(case_id): CasePath,
    ValidForm(form): ValidForm<CreatePaymentForm>,
) -> AppResult<Redirect> {
    state
        .service
        .record_payment(form.into_payment(case_id))
        .await?;
    Ok(Redirect::to(&format!("/case/{}", case_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClientId;
    use crate::infrastructure::persistence::InMemoryCaseRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use docket_config::PaymentCasePolicy;
    use tower::ServiceExt;

    async fn app(policy: PaymentCasePolicy) -> (Router, Arc<InMemoryCaseRepository>) {
        let repo = Arc::new(InMemoryCaseRepository::new());
        repo.add_client(ClientId(1), "Acme").await;
        let service = CaseService::new(repo.clone(), policy);
        let state = AppState::new(service, Views::embedded().unwrap());
        (router(state), repo)
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_create_case_redirects_to_index() {
        let (app, repo) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(post_form(
                "/add_case",
                "case_name=Theft&case_description=x&client_id=1",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        assert_eq!(repo.case_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_case_missing_client_is_404() {
        let (app, repo) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(post_form(
                "/add_case",
                "case_name=Theft&case_description=x&client_id=2",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Client not found!");
        assert_eq!(repo.case_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_case_missing_field_is_400() {
        let (app, repo) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(post_form("/add_case", "case_name=Theft&client_id=1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("case_description"));
        assert_eq!(repo.case_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_case_non_numeric_client_is_400() {
        let (app, _) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(post_form(
                "/add_case",
                "case_name=Theft&case_description=x&client_id=acme",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_case_detail_missing_is_404() {
        let (app, _) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(Request::get("/case/77").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Case not found!");
    }

    #[tokio::test]
    async fn test_case_detail_non_numeric_id_is_400() {
        let (app, _) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(Request::get("/case/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_case_form_renders() {
        let (app, _) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(Request::get("/add_case").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("name=\"case_name\""));
    }

    #[tokio::test]
    async fn test_add_payment_form_for_missing_case_still_renders() {
        let (app, _) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(
                Request::get("/add_payment_form/5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Add payment for case #5"));
    }

    #[tokio::test]
    async fn test_create_payment_redirects_to_case() {
        let (app, repo) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(post_form(
                "/add_payment/3",
                "amount=100.00&payment_date=2024-01-01",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/case/3");
        assert_eq!(repo.payment_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_payment_malformed_amount_is_400() {
        let (app, repo) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(post_form(
                "/add_payment/1",
                "amount=lots&payment_date=2024-01-01",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(repo.payment_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_payment_malformed_date_is_400() {
        let (app, repo) = app(PaymentCasePolicy::Lenient).await;

        let response = app
            .oneshot(post_form("/add_payment/1", "amount=10&payment_date=01/02/2024"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(repo.payment_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_payment_strict_policy_missing_case_is_404() {
        let (app, repo) = app(PaymentCasePolicy::RequireExistingCase).await;

        let response = app
            .oneshot(post_form(
                "/add_payment/3",
                "amount=100.00&payment_date=2024-01-01",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Case not found!");
        assert_eq!(repo.payment_count().await, 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_500() {
        let (app, repo) = app(PaymentCasePolicy::Lenient).await;
        repo.set_unavailable(true);

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal Server Error");
    }
}
