//! 团队路由

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use common::errors::AppError;
use common::extract::ValidJson;
use common::models::{CreateTeamRequest, MembershipRequest, TeamItem, UpdateTeamRequest};
use common::response::ApiResponse;
use common::utils::parse_object_id;

use crate::service::TeamService;
use crate::state::AppState;
use crate::SERVICE_NAME;

/// Mounted at `/api/teams`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route("/{id}", get(get_team).put(update_team).delete(delete_team))
        .route("/{id}/join", post(join_team))
        .route("/{id}/leave", post(leave_team))
}

/// 列出所有团队
#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "teams",
    responses(
        (status = 200, description = "团队列表", body = ApiResponse<Vec<TeamItem>>)
    )
)]
pub async fn list_teams(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamItem>>>, AppError> {
    let service = TeamService::new(state.monitor.database()?);
    let data = service.list().await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}

/// 创建团队
#[utoipa::path(
    post,
    path = "/api/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "团队已创建", body = ApiResponse<TeamItem>),
        (status = 400, description = "参数校验失败"),
        (status = 404, description = "创建者不存在")
    )
)]
pub async fn create_team(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TeamItem>>), AppError> {
    let owner_id = parse_object_id("owner_id", &req.owner_id)?;
    let service = TeamService::new(state.monitor.database()?);
    let data = service.create(owner_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_service(data, SERVICE_NAME)),
    ))
}

/// 根据 ID 获取团队
#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = String, Path, description = "团队 ID")),
    responses(
        (status = 200, description = "团队详情", body = ApiResponse<TeamItem>),
        (status = 404, description = "团队未找到")
    )
)]
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TeamItem>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let service = TeamService::new(state.monitor.database()?);
    let data = service.get(id).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}

/// 更新团队
#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = String, Path, description = "团队 ID")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "团队已更新", body = ApiResponse<TeamItem>),
        (status = 404, description = "团队未找到"),
        (status = 409, description = "成员数超过新上限")
    )
)]
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateTeamRequest>,
) -> Result<Json<ApiResponse<TeamItem>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let service = TeamService::new(state.monitor.database()?);
    let data = service.update(id, req).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}

/// 删除团队
#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = String, Path, description = "团队 ID")),
    responses(
        (status = 200, description = "团队已删除", body = ApiResponse<bool>),
        (status = 404, description = "团队未找到")
    )
)]
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let service = TeamService::new(state.monitor.database()?);
    service.delete(id).await?;
    Ok(Json(ApiResponse::ok_with_service(true, SERVICE_NAME)))
}

/// 加入团队
#[utoipa::path(
    post,
    path = "/api/teams/{id}/join",
    tag = "teams",
    params(("id" = String, Path, description = "团队 ID")),
    request_body = MembershipRequest,
    responses(
        (status = 200, description = "已加入", body = ApiResponse<TeamItem>),
        (status = 404, description = "团队或用户未找到"),
        (status = 409, description = "已是成员或团队已满")
    )
)]
pub async fn join_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<MembershipRequest>,
) -> Result<Json<ApiResponse<TeamItem>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let user_id = parse_object_id("user_id", &req.user_id)?;
    let service = TeamService::new(state.monitor.database()?);
    let data = service.join(id, user_id).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}

/// 退出团队
#[utoipa::path(
    post,
    path = "/api/teams/{id}/leave",
    tag = "teams",
    params(("id" = String, Path, description = "团队 ID")),
    request_body = MembershipRequest,
    responses(
        (status = 200, description = "已退出", body = ApiResponse<TeamItem>),
        (status = 403, description = "创建者不能退出"),
        (status = 404, description = "团队或成员未找到")
    )
)]
pub async fn leave_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<MembershipRequest>,
) -> Result<Json<ApiResponse<TeamItem>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let user_id = parse_object_id("user_id", &req.user_id)?;
    let service = TeamService::new(state.monitor.database()?);
    let data = service.leave(id, user_id).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}
