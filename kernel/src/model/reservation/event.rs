use chrono::{NaiveDate, NaiveTime};
use derive_new::new;

use crate::model::{
    id::{ReservationId, RoomId, UserId},
    reservation::ReservationStatus,
};

#[derive(new)]
pub struct CreateReservation {
    pub room_id: RoomId,
    pub reserved_by: UserId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

// Status is deliberately absent: owner edits never change it.
#[derive(new)]
pub struct UpdateReservation {
    pub reservation_id: ReservationId,
    pub room_id: RoomId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(new)]
pub struct UpdateReservationStatus {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
}

#[derive(new)]
pub struct DeleteReservation {
    pub reservation_id: ReservationId,
}
