//! Transfer workflow handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use custody_core::types::pagination::{PageRequest, PageResponse};
use custody_entity::transfer::{CreateTransfer, TransferRequest};

use crate::dto::request::{CreateTransferRequest, DecisionRequest, TransferListQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::state::AppState;

/// POST /api/transfers
pub async fn create_transfer(
    State(state): State<AppState>,
    actor: Actor,
    Json(body): Json<CreateTransferRequest>,
) -> Result<Json<ApiResponse<TransferRequest>>, ApiError> {
    let request = state
        .workflow
        .create(
            &actor,
            CreateTransfer {
                asset_id: body.asset_id,
                to_user_id: body.to_user_id,
                reason: body.reason,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/transfers/{id}/hod-decision
pub async fn hod_decision(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(body): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<TransferRequest>>, ApiError> {
    let request = state
        .workflow
        .decide_as_hod(&actor, id, body.action.into(), body.comments)
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/transfers/{id}/supervisor-decision
pub async fn supervisor_decision(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(body): Json<DecisionRequest>,
) -> Result<Json<ApiResponse<TransferRequest>>, ApiError> {
    let request = state
        .workflow
        .decide_as_supervisor(&actor, id, body.action.into(), body.comments)
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// GET /api/transfers/{id}
pub async fn get_transfer(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransferRequest>>, ApiError> {
    let request = state.workflow.get_request(&actor, id).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// GET /api/transfers
pub async fn list_transfers(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<TransferListQuery>,
) -> Result<Json<ApiResponse<PageResponse<TransferRequest>>>, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(defaults.page),
        query.page_size.unwrap_or(defaults.page_size),
    );
    let result = state
        .workflow
        .list_for_actor(&actor, query.status, &page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}
