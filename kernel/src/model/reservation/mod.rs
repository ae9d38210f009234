pub mod event;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use strum::{AsRefStr, Display, EnumString};

use crate::model::{
    id::{ReservationId, RoomId},
    user::ReservationUser,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, sqlx::Type,
)]
#[strum(serialize_all = "lowercase")]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub reserved_by: ReservationUser,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub room: ReservationRoom,
}

/// Room facts carried on a reservation listing row.
#[derive(Debug, Clone)]
pub struct ReservationRoom {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub location: String,
    pub is_active: bool,
}
