use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use shared::error::AppResult;

use crate::model::{
    id::{ReservationId, RoomId, UserId},
    reservation::{
        event::{
            CreateReservation, DeleteReservation, UpdateReservation, UpdateReservationStatus,
        },
        Reservation,
    },
};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Admit a new reservation: slot rules, active-room check and overlap scan
    /// run atomically with the insert. Returns the new reservation id.
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId>;
    /// Re-admit an edited reservation against everything but itself.
    /// Status is left untouched.
    async fn update(&self, event: UpdateReservation) -> AppResult<()>;
    /// Persist a status change. No overlap re-check on status alone.
    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<()>;
    async fn delete(&self, event: DeleteReservation) -> AppResult<()>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // Ordered by date then start time.
    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Reservation>>;
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;
    async fn find_all(&self) -> AppResult<Vec<Reservation>>;
    /// Reserved (start, end) pairs for a room/date, start asc then end asc.
    async fn reserved_intervals(
        &self,
        room_id: RoomId,
        date: NaiveDate,
    ) -> AppResult<Vec<(NaiveTime, NaiveTime)>>;
    /// Dates in [from, from + days) with spare capacity. Capacity heuristic:
    /// fewer non-cancelled reservations than slots in a day.
    async fn available_dates(
        &self,
        room_id: RoomId,
        from: NaiveDate,
        days: u32,
    ) -> AppResult<Vec<NaiveDate>>;
}
