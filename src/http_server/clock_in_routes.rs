//! Clock-in HTTP Routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use super::extract::ApiJson;
use super::response::{ClockInCreatedResponse, MessageResponse};
use super::state::AppState;
use crate::allocator::CLOCK_IN_SEQUENCE;
use crate::errors::{ApiError, ApiResult};
use crate::records::{ClockIn, ClockInFilter, NewClockIn, UpdateClockIn};

/// Create clock-in routes
pub fn clock_in_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/clock-in", post(create_clock_in_handler))
        .route("/clock-in/filter", get(filter_clock_ins_handler))
        .route(
            "/clock-in/:id",
            get(get_clock_in_handler)
                .put(update_clock_in_handler)
                .delete(delete_clock_in_handler),
        )
        .with_state(state)
}

async fn create_clock_in_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewClockIn>,
) -> ApiResult<(StatusCode, Json<ClockInCreatedResponse>)> {
    let id = state.ids.next(CLOCK_IN_SEQUENCE).await?;
    let record = payload.into_record(id, Utc::now());
    state.clock_ins.insert(&record).await?;

    tracing::info!(id, location = %record.location, "clock-in recorded");
    Ok((
        StatusCode::CREATED,
        Json(ClockInCreatedResponse { clockin_id: id }),
    ))
}

async fn get_clock_in_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ClockIn>> {
    state
        .clock_ins
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Clock-in record not found"))
}

async fn update_clock_in_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<UpdateClockIn>,
) -> ApiResult<Json<MessageResponse>> {
    update.validate()?;

    let modified = state.clock_ins.update(id, update.set_fields()).await?;
    if modified == 0 {
        return Err(ApiError::not_found(
            "Clock-in record not found or same values for the field hence no changes made.",
        ));
    }

    tracing::info!(id, "clock-in updated");
    Ok(Json(MessageResponse::new("Clock-in record updated")))
}

/// Always acknowledges; deleting an absent record is not an error here
async fn delete_clock_in_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = state.clock_ins.delete(id).await?;
    tracing::info!(id, deleted, "clock-in delete");
    Ok(Json(MessageResponse::new("Clock-in record deleted")))
}

async fn filter_clock_ins_handler(
    State(state): State<Arc<AppState>>,
    Query(criteria): Query<ClockInFilter>,
) -> ApiResult<Json<Vec<ClockIn>>> {
    let filter = criteria.to_filter()?;
    tracing::debug!(terms = filter.len(), "filtering clock-ins");

    Ok(Json(state.clock_ins.find(&filter).await?))
}
