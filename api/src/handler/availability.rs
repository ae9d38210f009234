use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use kernel::model::id::RoomId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::availability::{ReservedTimeResponse, ReservedTimesQuery};

/// How far ahead the calendar front end may look for free days.
const AVAILABILITY_WINDOW_DAYS: u32 = 30;

// Both endpoints are consumed by the public calendar widget and therefore
// take no principal.

pub async fn reserved_times(
    Path(room_id): Path<RoomId>,
    Query(query): Query<ReservedTimesQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<ReservedTimeResponse>>> {
    ensure_room_exists(&registry, room_id).await?;

    let intervals = registry
        .reservation_repository()
        .reserved_intervals(room_id, query.date)
        .await?;
    Ok(Json(
        intervals.into_iter().map(ReservedTimeResponse::from).collect(),
    ))
}

pub async fn available_dates(
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<NaiveDate>>> {
    ensure_room_exists(&registry, room_id).await?;

    let today = Local::now().date_naive();
    let dates = registry
        .reservation_repository()
        .available_dates(room_id, today, AVAILABILITY_WINDOW_DAYS)
        .await?;
    Ok(Json(dates))
}

async fn ensure_room_exists(registry: &AppRegistry, room_id: RoomId) -> AppResult<()> {
    registry
        .room_repository()
        .find_by_id(room_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::EntityNotFound("room not found".into()))
}
