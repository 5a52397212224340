//! Charger API handlers
//!
//! Partners act on their own chargers. Administrators act on any charger
//! through its owning partner, so cache keys stay partner-scoped.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::{BatchStatusResponse, ControlChargerRequest, UpdateStatusRequest};
use crate::application::{ChargerControlService, ChargerStatusSnapshot, ControlOutcome, ControlRequest};
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct ChargerState {
    pub chargers: Arc<ChargerControlService>,
}

/// Partner id to act as: the caller itself, or the owner for admins.
async fn acting_partner(
    service: &ChargerControlService,
    principal: &Principal,
    charger_id: &str,
) -> crate::domain::DomainResult<i32> {
    match principal {
        Principal::Partner { partner_id } => Ok(*partner_id),
        Principal::Admin { .. } => service.owner_of(charger_id).await,
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/chargers/{charger_id}/status",
    tag = "Chargers",
    params(("charger_id" = String, Path, description = "Charger business id")),
    responses(
        (status = 200, description = "Current status", body = ApiResponse<ChargerStatusSnapshot>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Charger not found")
    ),
    security(("api_key" = []), ("bearer_auth" = []))
)]
pub async fn get_charger_status(
    State(state): State<ChargerState>,
    Extension(principal): Extension<Principal>,
    Path(charger_id): Path<String>,
) -> ApiResult<ChargerStatusSnapshot> {
    let snapshot = match principal {
        Principal::Partner { partner_id } => {
            state.chargers.get_status(partner_id, &charger_id).await?
        }
        Principal::Admin { .. } => state.chargers.get_status_by_charger_id(&charger_id).await?,
    };
    Ok(Json(ApiResponse::success(snapshot)))
}

#[utoipa::path(
    put,
    path = "/api/v1/chargers/{charger_id}/status",
    tag = "Chargers",
    params(("charger_id" = String, Path, description = "Charger business id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status overwritten", body = ApiResponse<ChargerStatusSnapshot>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Charger not found"),
        (status = 422, description = "Validation error")
    ),
    security(("api_key" = []), ("bearer_auth" = []))
)]
pub async fn update_charger_status(
    State(state): State<ChargerState>,
    Extension(principal): Extension<Principal>,
    Path(charger_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<ChargerStatusSnapshot> {
    let partner_id = acting_partner(&state.chargers, &principal, &charger_id).await?;
    let snapshot = state
        .chargers
        .set_status(partner_id, &charger_id, body.status)
        .await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

/// Always answers 200; failures are reported inside the outcome.
#[utoipa::path(
    post,
    path = "/api/v1/chargers/{charger_id}/control",
    tag = "Chargers",
    params(("charger_id" = String, Path, description = "Charger business id")),
    request_body = ControlChargerRequest,
    responses(
        (status = 200, description = "Control outcome", body = ApiResponse<ControlOutcome>),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error")
    ),
    security(("api_key" = []), ("bearer_auth" = []))
)]
pub async fn control_charger(
    State(state): State<ChargerState>,
    Extension(principal): Extension<Principal>,
    Path(charger_id): Path<String>,
    ValidatedJson(body): ValidatedJson<ControlChargerRequest>,
) -> ApiResult<ControlOutcome> {
    let request = ControlRequest {
        charger_id,
        action: body.action,
        reason: body.reason,
        force: body.force,
    };

    let outcome = match acting_partner(&state.chargers, &principal, &request.charger_id).await {
        Ok(partner_id) => state.chargers.control_charger(partner_id, request).await,
        Err(e) => ControlOutcome::failed(&request, e.to_string()),
    };
    Ok(Json(ApiResponse::success(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/v1/chargers/batch/status",
    tag = "Chargers",
    responses(
        (status = 200, description = "Status of every visible charger", body = ApiResponse<BatchStatusResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("api_key" = []), ("bearer_auth" = []))
)]
pub async fn get_batch_status(
    State(state): State<ChargerState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<BatchStatusResponse> {
    let chargers = state
        .chargers
        .get_batch_status(principal.partner_id())
        .await?;
    Ok(Json(ApiResponse::success(BatchStatusResponse {
        total: chargers.len(),
        chargers,
    })))
}
