//! Asset custody history handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use custody_core::types::pagination::PageResponse;
use custody_entity::transfer::TransferHistoryEntry;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{Actor, PaginationParams};
use crate::state::AppState;

/// GET /api/assets/{id}/history
pub async fn asset_history(
    State(state): State<AppState>,
    _actor: Actor,
    Path(asset_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<TransferHistoryEntry>>>, ApiError> {
    let page = params.into_page_request();
    let result = state.workflow.history_for_asset(asset_id, &page).await?;
    Ok(Json(ApiResponse::ok(result)))
}
