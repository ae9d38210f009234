use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{reservation::Reservation, user::User};

/// Outbound notification collaborator. Invoked after a reservation commits;
/// callers must treat failures as log-only and never roll back the booking.
#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    async fn notify_created(&self, reservation: &Reservation, acting_user: &User) -> AppResult<()>;
}
