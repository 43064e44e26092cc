//! 创意路由

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use common::errors::AppError;
use common::extract::ValidJson;
use common::models::{CreateIdeaRequest, IdeaItem, ListIdeasQuery, UpdateIdeaRequest};
use common::response::{ApiResponse, PaginatedData};
use common::utils::parse_object_id;

use crate::service::IdeaService;
use crate::state::AppState;
use crate::SERVICE_NAME;

/// Mounted at `/api/ideas`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ideas).post(create_idea))
        .route("/{id}", get(get_idea).put(update_idea).delete(delete_idea))
}

/// 分页列出创意
#[utoipa::path(
    get,
    path = "/api/ideas",
    tag = "ideas",
    params(ListIdeasQuery),
    responses(
        (status = 200, description = "创意列表", body = ApiResponse<PaginatedData<IdeaItem>>)
    )
)]
pub async fn list_ideas(
    State(state): State<AppState>,
    Query(query): Query<ListIdeasQuery>,
) -> Result<Json<ApiResponse<PaginatedData<IdeaItem>>>, AppError> {
    let service = IdeaService::new(state.monitor.database()?);
    let data = service.list(&query).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}

/// 提交创意
#[utoipa::path(
    post,
    path = "/api/ideas",
    tag = "ideas",
    request_body = CreateIdeaRequest,
    responses(
        (status = 201, description = "创意已提交", body = ApiResponse<IdeaItem>),
        (status = 400, description = "参数校验失败"),
        (status = 404, description = "作者或团队不存在")
    )
)]
pub async fn create_idea(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateIdeaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<IdeaItem>>), AppError> {
    let author_id = parse_object_id("author_id", &req.author_id)?;
    let team_id = req
        .team_id
        .as_deref()
        .map(|id| parse_object_id("team_id", id))
        .transpose()?;
    let service = IdeaService::new(state.monitor.database()?);
    let data = service.create(author_id, team_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_service(data, SERVICE_NAME)),
    ))
}

/// 根据 ID 获取创意
#[utoipa::path(
    get,
    path = "/api/ideas/{id}",
    tag = "ideas",
    params(("id" = String, Path, description = "创意 ID")),
    responses(
        (status = 200, description = "创意详情", body = ApiResponse<IdeaItem>),
        (status = 404, description = "创意未找到")
    )
)]
pub async fn get_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<IdeaItem>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let service = IdeaService::new(state.monitor.database()?);
    let data = service.get(id).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}

/// 更新创意
#[utoipa::path(
    put,
    path = "/api/ideas/{id}",
    tag = "ideas",
    params(("id" = String, Path, description = "创意 ID")),
    request_body = UpdateIdeaRequest,
    responses(
        (status = 200, description = "创意已更新", body = ApiResponse<IdeaItem>),
        (status = 404, description = "创意未找到")
    )
)]
pub async fn update_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateIdeaRequest>,
) -> Result<Json<ApiResponse<IdeaItem>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let service = IdeaService::new(state.monitor.database()?);
    let data = service.update(id, req).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}

/// 删除创意
#[utoipa::path(
    delete,
    path = "/api/ideas/{id}",
    tag = "ideas",
    params(("id" = String, Path, description = "创意 ID")),
    responses(
        (status = 200, description = "创意已删除", body = ApiResponse<bool>),
        (status = 404, description = "创意未找到")
    )
)]
pub async fn delete_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, AppError> {
    let id = parse_object_id("id", &id)?;
    let service = IdeaService::new(state.monitor.database()?);
    service.delete(id).await?;
    Ok(Json(ApiResponse::ok_with_service(true, SERVICE_NAME)))
}
