//! Partner API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    ChangeStatusRequest, ChargerCountResponse, CreatePartnerRequest, ListPartnersParams,
    PartnerDto, UpdatePartnerRequest,
};
use crate::application::PartnerService;
use crate::domain::PartnerStatistics;
use crate::interfaces::http::common::{
    ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::shared::PageRequest;

#[derive(Clone)]
pub struct PartnerState {
    pub partners: Arc<PartnerService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/partners",
    tag = "Partners",
    request_body = CreatePartnerRequest,
    responses(
        (status = 201, description = "Partner created", body = ApiResponse<PartnerDto>),
        (status = 409, description = "Email already exists"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_partner(
    State(state): State<PartnerState>,
    ValidatedJson(body): ValidatedJson<CreatePartnerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PartnerDto>>), ApiError> {
    let partner = state.partners.create(body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PartnerDto::from(partner))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/partners",
    tag = "Partners",
    params(ListPartnersParams),
    responses(
        (status = 200, description = "Page of partners, newest first", body = ApiResponse<PaginatedResponse<PartnerDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_partners(
    State(state): State<PartnerState>,
    Query(params): Query<ListPartnersParams>,
) -> ApiResult<PaginatedResponse<PartnerDto>> {
    let page = state
        .partners
        .list(params.status, PageRequest::new(params.page, params.limit))
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        PartnerDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/partners/statistics",
    tag = "Partners",
    responses(
        (status = 200, description = "Partner counts by status", body = ApiResponse<PartnerStatistics>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn partner_statistics(State(state): State<PartnerState>) -> ApiResult<PartnerStatistics> {
    Ok(Json(ApiResponse::success(state.partners.statistics().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/partners/{id}",
    tag = "Partners",
    params(("id" = i32, Path, description = "Partner id")),
    responses(
        (status = 200, description = "Partner", body = ApiResponse<PartnerDto>),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_partner(
    State(state): State<PartnerState>,
    Path(id): Path<i32>,
) -> ApiResult<PartnerDto> {
    let partner = state.partners.get(id).await?;
    Ok(Json(ApiResponse::success(partner.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/partners/{id}",
    tag = "Partners",
    params(("id" = i32, Path, description = "Partner id")),
    request_body = UpdatePartnerRequest,
    responses(
        (status = 200, description = "Partner updated", body = ApiResponse<PartnerDto>),
        (status = 404, description = "Partner not found"),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_partner(
    State(state): State<PartnerState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdatePartnerRequest>,
) -> ApiResult<PartnerDto> {
    let partner = state.partners.update(id, body.into()).await?;
    Ok(Json(ApiResponse::success(partner.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/auth/partners/{id}",
    tag = "Partners",
    params(("id" = i32, Path, description = "Partner id")),
    responses(
        (status = 200, description = "Partner deleted"),
        (status = 404, description = "Partner not found"),
        (status = 409, description = "Partner still owns chargers")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_partner(
    State(state): State<PartnerState>,
    Path(id): Path<i32>,
) -> ApiResult<String> {
    state.partners.delete(id).await?;
    Ok(Json(ApiResponse::success(format!("Partner {} deleted", id))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/auth/partners/{id}/status",
    tag = "Partners",
    params(("id" = i32, Path, description = "Partner id")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<PartnerDto>),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_partner_status(
    State(state): State<PartnerState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<ChangeStatusRequest>,
) -> ApiResult<PartnerDto> {
    let partner = state.partners.change_status(id, body.status).await?;
    Ok(Json(ApiResponse::success(partner.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/partners/{id}/rotate-key",
    tag = "Partners",
    params(("id" = i32, Path, description = "Partner id")),
    responses(
        (status = 200, description = "New API key issued", body = ApiResponse<PartnerDto>),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn rotate_partner_key(
    State(state): State<PartnerState>,
    Path(id): Path<i32>,
) -> ApiResult<PartnerDto> {
    let partner = state.partners.rotate_api_key(id).await?;
    Ok(Json(ApiResponse::success(partner.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/partners/{id}/chargers/count",
    tag = "Partners",
    params(("id" = i32, Path, description = "Partner id")),
    responses(
        (status = 200, description = "Number of chargers owned", body = ApiResponse<ChargerCountResponse>),
        (status = 404, description = "Partner not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn partner_charger_count(
    State(state): State<PartnerState>,
    Path(id): Path<i32>,
) -> ApiResult<ChargerCountResponse> {
    let charger_count = state.partners.charger_count(id).await?;
    Ok(Json(ApiResponse::success(ChargerCountResponse {
        partner_id: id,
        charger_count,
    })))
}
