//! HackMate API 服务
//!
//! 提供以下功能：
//! - 账号注册与登录
//! - 用户资料、团队与创意的增删改查
//! - 前端静态文件托管
//! - 反映数据库连接状态的健康检查
//!
//! The listener is bound before the database connect starts, and a failed
//! connect never stops the server.

pub mod db;
pub mod routes;
pub mod service;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Json, Router};
use common::middleware::request_id::request_id_middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;

use crate::db::{spawn_connect, Connector};
use crate::state::AppState;

pub const SERVICE_NAME: &str = "api-server";

/// Maximum accepted request body.
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HackMate API",
        version = "0.1.0",
        description = "认证、用户资料、团队与创意管理"
    ),
    paths(
        routes::health::health_check,
        routes::auth::register,
        routes::auth::login,
        routes::users::list_users,
        routes::users::get_user,
        routes::users::update_user,
        routes::teams::list_teams,
        routes::teams::create_team,
        routes::teams::get_team,
        routes::teams::update_team,
        routes::teams::delete_team,
        routes::teams::join_team,
        routes::teams::leave_team,
        routes::ideas::list_ideas,
        routes::ideas::create_idea,
        routes::ideas::get_idea,
        routes::ideas::update_idea,
        routes::ideas::delete_idea,
    ),
    components(schemas(
        routes::health::HealthResponse,
        common::models::UserProfile,
        common::models::RegisterRequest,
        common::models::LoginRequest,
        common::models::UpdateProfileRequest,
        common::models::TeamItem,
        common::models::CreateTeamRequest,
        common::models::UpdateTeamRequest,
        common::models::MembershipRequest,
        common::models::IdeaItem,
        common::models::CreateIdeaRequest,
        common::models::UpdateIdeaRequest,
    )),
    tags(
        (name = "auth", description = "认证端点"),
        (name = "users", description = "用户资料端点"),
        (name = "teams", description = "团队端点"),
        (name = "ideas", description = "创意端点"),
        (name = "health", description = "健康检查端点")
    )
)]
struct ApiDoc;

/// Builds the full application: routes, static files and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router(&state.config.static_root))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Serves on an already-bound listener until `shutdown` resolves.
///
/// The database connect is spawned only after the listener exists and is
/// never awaited by the serve loop. On shutdown a still-pending connect is
/// abandoned and an open client is closed.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    connector: Arc<dyn Connector>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state.clone());
    let connect = spawn_connect(
        state.monitor.clone(),
        connector,
        state.config.mongo_uri.clone(),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    connect.abort();
    state.monitor.disconnect().await;
    info!(service = SERVICE_NAME, "服务已停止");
    Ok(())
}
