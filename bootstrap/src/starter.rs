//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use docket_config::AppConfig;
use docket_errors::AppResult;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::health::{HealthChecker, health_routes};
use crate::infrastructure::Infrastructure;
use crate::metrics::{MetricsRecorder, PoolMetricsCollector, track_http_requests};
use crate::runtime::{init_runtime, shutdown_signal};

/// 连接池指标采集间隔
const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(15);

/// 运行 HTTP 服务
///
/// 这是服务的统一入口点。它负责：
/// 1. 加载 `.env` 与配置
/// 2. 初始化运行时（日志）
/// 3. 安装 Prometheus 记录器
/// 4. 创建基础设施资源（数据库连接池）
/// 5. 调用用户提供的闭包构建业务路由
/// 6. 合并健康检查路由并启动服务器，处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// use docket_bootstrap::run_http;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_http("config", |infra| async move {
///         Ok(my_service::router(infra.postgres_pool()))
///     }).await
/// }
/// ```
pub async fn run_http<F, Fut>(
    config_dir: &str,
    router_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    // 1. 加载配置
    dotenvy::dotenv().ok();
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    // 3. 初始化 Metrics 记录器
    let metrics = MetricsRecorder::install()?;

    // 4. 创建基础设施
    let infra = Infrastructure::from_config(config.clone()).await?;

    let pool_collector =
        PoolMetricsCollector::new(Arc::new(infra.clone()), POOL_METRICS_INTERVAL).start();

    let health_checker = Arc::new(HealthChecker::new(infra.postgres_pool()));

    // 5. 构建服务地址与路由
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let service_router = router_builder(infra).await?;
    let app = compose_app(service_router, health_checker, metrics);

    info!(%addr, "HTTP server starting");

    // 6. 启动服务器
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 7. 清理
    pool_collector.abort();

    info!("Service stopped");

    Ok(())
}

/// 合并业务路由与健康检查路由，并挂载请求追踪与计数中间件
pub fn compose_app(
    service_router: Router,
    health_checker: Arc<HealthChecker>,
    metrics: MetricsRecorder,
) -> Router {
    service_router
        .merge(health_routes(health_checker, metrics))
        .layer(axum::middleware::from_fn(track_http_requests))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
    use tower::ServiceExt;

    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy_with(PgConnectOptions::new().host("127.0.0.1").port(1));
        let metrics = MetricsRecorder::from_handle(PrometheusBuilder::new().build_recorder().handle());
        let service = Router::new().route("/", get(|| async { "cases" }));

        compose_app(service, Arc::new(HealthChecker::new(pool)), metrics)
    }

    #[tokio::test]
    async fn test_service_and_health_routes_are_merged() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
