//! Metrics 模块
//!
//! 提供 Prometheus metrics 导出

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusHandle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::infrastructure::{Infrastructure, PoolStatus};

/// Metrics 记录器
#[derive(Clone)]
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// 安装全局 Prometheus 记录器
    pub fn install() -> Result<Self, BuildError> {
        let handle = docket_telemetry::init_metrics()?;
        Ok(Self { handle })
    }

    /// 使用已有的 handle（用于测试，不安装全局记录器）
    pub fn from_handle(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// 记录 HTTP 请求
pub fn record_http_request(method: &str, route: &str, status: u16, duration_ms: f64) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_ms", &labels).record(duration_ms);
}

/// HTTP 请求计数中间件
///
/// 路由标签使用匹配到的路由模板（如 `/case/{case_id}`），避免标签基数随 ID 增长
pub async fn track_http_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64() * 1000.0;
    record_http_request(&method, &route, response.status().as_u16(), duration);

    response
}

/// 连接池 Metrics 采集器
///
/// 定期采集 PostgreSQL 连接池状态
pub struct PoolMetricsCollector {
    infra: Arc<Infrastructure>,
    interval: Duration,
}

impl PoolMetricsCollector {
    pub fn new(infra: Arc<Infrastructure>, interval: Duration) -> Self {
        Self { infra, interval }
    }

    /// 启动后台采集任务
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;

                let pool_status = self.infra.postgres_pool_status();
                record_postgres_pool_metrics(&pool_status);

                debug!(
                    postgres_size = pool_status.size,
                    postgres_idle = pool_status.idle,
                    postgres_active = pool_status.active,
                    "Pool metrics collected"
                );
            }
        })
    }
}

/// 记录 PostgreSQL 连接池指标
pub fn record_postgres_pool_metrics(status: &PoolStatus) {
    gauge!("postgres_pool_size").set(status.size as f64);
    gauge!("postgres_pool_idle").set(status.idle as f64);
    gauge!("postgres_pool_active").set(status.active as f64);
    gauge!("postgres_pool_utilization").set(status.utilization());
}
