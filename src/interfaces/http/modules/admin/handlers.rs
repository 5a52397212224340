use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{LoginRequest, RefreshRequest, TokenResponse};
use crate::application::AdminAuthService;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct AdminState {
    pub admin: Arc<AdminAuthService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    tag = "Admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh tokens", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AdminState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let tokens = state.admin.login(&body.username, &body.password).await?;
    Ok(Json(ApiResponse::success(tokens.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/refresh",
    tag = "Admin",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AdminState>,
    ValidatedJson(body): ValidatedJson<RefreshRequest>,
) -> ApiResult<TokenResponse> {
    let tokens = state.admin.refresh(&body.refresh_token).await?;
    Ok(Json(ApiResponse::success(tokens.into())))
}
