use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::model::{
    id::{ReservationId, RoomId, UserId},
    reservation::{Reservation, ReservationRoom, ReservationStatus},
    user::ReservationUser,
};

/// One reservation joined with its room and owner.
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub title: String,
    pub description: String,
    pub reserved_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub room_id: RoomId,
    pub room_name: String,
    pub capacity: i32,
    pub location: String,
    pub is_active: bool,
}

impl From<ReservationRow> for Reservation {
    fn from(value: ReservationRow) -> Self {
        let ReservationRow {
            reservation_id,
            user_id,
            user_name,
            email,
            title,
            description,
            reserved_date,
            start_time,
            end_time,
            status,
            created_at,
            updated_at,
            room_id,
            room_name,
            capacity,
            location,
            is_active,
        } = value;
        Reservation {
            reservation_id,
            reserved_by: ReservationUser {
                user_id,
                user_name,
                email,
            },
            title,
            description,
            date: reserved_date,
            start_time,
            end_time,
            status,
            created_at,
            updated_at,
            room: ReservationRoom {
                room_id,
                name: room_name,
                capacity,
                location,
                is_active,
            },
        }
    }
}

/// Bare (start, end) pair for the calendar endpoints.
#[derive(sqlx::FromRow)]
pub struct IntervalRow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Per-date reservation count used by the availability heuristic.
#[derive(sqlx::FromRow)]
pub struct DateCountRow {
    pub reserved_date: NaiveDate,
    pub total: i64,
}
