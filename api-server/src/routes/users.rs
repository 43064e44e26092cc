//! 用户资料路由

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use common::errors::AppError;
use common::extract::ValidJson;
use common::models::{ListUsersQuery, UpdateProfileRequest, UserProfile};
use common::response::ApiResponse;
use common::utils::parse_object_id;

use crate::service::UserService;
use crate::state::AppState;
use crate::SERVICE_NAME;

/// Mounted at `/api/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).put(update_user))
}

/// 列出用户资料
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "用户列表", body = ApiResponse<Vec<UserProfile>>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, AppError> {
    let service = UserService::new(state.monitor.database()?);
    let data = service.list(&query).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}

/// 根据 ID 获取用户资料
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "用户 ID")),
    responses(
        (status = 200, description = "用户资料", body = ApiResponse<UserProfile>),
        (status = 404, description = "用户未找到")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let service = UserService::new(state.monitor.database()?);
    let data = service.get(id).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}

/// 更新用户资料
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "用户 ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "资料已更新", body = ApiResponse<UserProfile>),
        (status = 400, description = "参数校验失败"),
        (status = 404, description = "用户未找到")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let service = UserService::new(state.monitor.database()?);
    let data = service.update(id, req).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}
