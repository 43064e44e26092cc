//! 健康检查路由

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check paths. `/api/helth` is a typo alias that external monitors
/// depend on.
pub const HEALTH_PATHS: [&str; 2] = ["/api/health", "/api/helth"];

pub fn router() -> Router<AppState> {
    HEALTH_PATHS
        .iter()
        .fold(Router::new(), |router, path| router.route(path, get(health_check)))
}

/// 健康检查端点
///
/// Always 200 with `status: "ok"`; `db` carries the database link state.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行中", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        db: state.monitor.state_label().to_string(),
    })
}

/// 健康检查响应
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// One of `disconnected`, `connected`, `connecting`, `disconnecting`,
    /// `unknown`.
    pub db: String,
}
