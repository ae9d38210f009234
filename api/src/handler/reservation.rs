use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{ReservationId, RoomId},
    reservation::{
        event::{DeleteReservation, UpdateReservationStatus},
        Reservation,
    },
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::reservation::{
        parse_status, AdminCreateReservationRequest, CreateReservationRequest,
        CreateReservationRequestWithIds, ReservationResponse, ReservationsResponse,
        UpdateReservationRequest, UpdateReservationRequestWithId, UpdateReservationStatusRequest,
    },
};

pub async fn reserve_room(
    user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    let event = CreateReservationRequestWithIds::new(room_id, user.id(), req);
    let reservation_id = registry.reservation_repository().create(event.into()).await?;

    let reservation = fetch_reservation(&registry, reservation_id).await?;
    spawn_created_notification(&registry, reservation.clone(), user);

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

pub async fn admin_reserve_room(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<AdminCreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let reservation_id = registry.reservation_repository().create(req.into()).await?;

    let reservation = fetch_reservation(&registry, reservation_id).await?;
    spawn_created_notification(&registry, reservation.clone(), user);

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

pub async fn show_reservation(
    _user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    fetch_reservation(&registry, reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn show_room_reservations(
    _user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_by_room_id(room_id)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_my_reservations(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_by_user_id(user.id())
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_all_reservations(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    registry
        .reservation_repository()
        .find_all()
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn update_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    // Only the owner may edit; staff override is limited to status and delete.
    let current = fetch_reservation(&registry, reservation_id).await?;
    if current.reserved_by.user_id != user.id() {
        return Err(AppError::ForbiddenOperation);
    }

    let event = UpdateReservationRequestWithId::new(reservation_id, req);
    registry.reservation_repository().update(event.into()).await?;

    fetch_reservation(&registry, reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn update_reservation_status(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationStatusRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let current = fetch_reservation(&registry, reservation_id).await?;
    if current.reserved_by.user_id != user.id() && !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    let status = parse_status(&req.status)?;

    registry
        .reservation_repository()
        .update_status(UpdateReservationStatus::new(reservation_id, status))
        .await?;

    fetch_reservation(&registry, reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn delete_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let current = fetch_reservation(&registry, reservation_id).await?;
    if current.reserved_by.user_id != user.id() && !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .reservation_repository()
        .delete(DeleteReservation::new(reservation_id))
        .await
        .map(|_| StatusCode::NO_CONTENT)
}

async fn fetch_reservation(
    registry: &AppRegistry,
    reservation_id: ReservationId,
) -> AppResult<Reservation> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("reservation not found".into()))
}

// The booking is already committed, so the notification runs detached and a
// failing mail gateway can only cost us a log line.
fn spawn_created_notification(
    registry: &AppRegistry,
    reservation: Reservation,
    acting_user: AuthorizedUser,
) {
    let notifier = registry.reservation_notifier();
    tokio::spawn(async move {
        if let Err(e) = notifier
            .notify_created(&reservation, &acting_user.user)
            .await
        {
            tracing::warn!(
                error.message = %e,
                reservation_id = %reservation.reservation_id,
                "failed to send reservation-created notification"
            );
        }
    });
}
