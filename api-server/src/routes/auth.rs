//! 认证路由

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use common::errors::AppError;
use common::extract::ValidJson;
use common::models::{LoginRequest, RegisterRequest, UserProfile};
use common::response::ApiResponse;

use crate::service::AuthService;
use crate::state::AppState;
use crate::SERVICE_NAME;

/// Mounted at `/api/auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// 注册新账号
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "账号已创建", body = ApiResponse<UserProfile>),
        (status = 400, description = "参数校验失败"),
        (status = 409, description = "邮箱已注册")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), AppError> {
    let service = AuthService::new(state.monitor.database()?);
    let data = service.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_service(data, SERVICE_NAME)),
    ))
}

/// 登录
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = ApiResponse<UserProfile>),
        (status = 401, description = "邮箱或密码错误")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let service = AuthService::new(state.monitor.database()?);
    let data = service.login(req).await?;
    Ok(Json(ApiResponse::ok_with_service(data, SERVICE_NAME)))
}
