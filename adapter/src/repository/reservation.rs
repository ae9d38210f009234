use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use derive_new::new;
use kernel::model::id::{ReservationId, RoomId, UserId};
use kernel::model::reservation::{
    event::{CreateReservation, DeleteReservation, UpdateReservation, UpdateReservationStatus},
    Reservation,
};
use kernel::repository::reservation::ReservationRepository;
use kernel::slot;
use shared::error::{AppError, AppResult};

use crate::database::{
    lock_room_date,
    model::reservation::{DateCountRow, IntervalRow, ReservationRow},
    ConnectionPool,
};

const FIND_RESERVATION_SQL: &str = r#"
    SELECT
        r.reservation_id,
        r.user_id,
        u.user_name,
        u.email,
        r.title,
        r.description,
        r.reserved_date,
        r.start_time,
        r.end_time,
        r.status,
        r.created_at,
        r.updated_at,
        rm.room_id,
        rm.name AS room_name,
        rm.capacity,
        rm.location,
        rm.is_active
    FROM reservations AS r
    INNER JOIN rooms AS rm ON r.room_id = rm.room_id
    INNER JOIN users AS u ON r.user_id = u.user_id
"#;

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        // Interval shape is checked before touching the database so a
        // malformed request never opens a transaction.
        slot::validate_interval(event.start_time, event.end_time)?;

        let mut tx = self.db.begin().await?;
        lock_room_date(&mut tx, event.room_id, event.date).await?;

        self.check_room_bookable(&mut tx, event.room_id).await?;
        self.check_no_overlap(
            &mut tx,
            event.room_id,
            event.date,
            event.start_time,
            event.end_time,
            None,
        )
        .await?;

        let reservation_id = ReservationId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO reservations
                (reservation_id, room_id, user_id, title, description,
                 reserved_date, start_time, end_time, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
            "#,
        )
        .bind(reservation_id)
        .bind(event.room_id)
        .bind(event.reserved_by)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.start_time)
        .bind(event.end_time)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(reservation_id)
    }

    async fn update(&self, event: UpdateReservation) -> AppResult<()> {
        slot::validate_interval(event.start_time, event.end_time)?;

        let mut tx = self.db.begin().await?;
        lock_room_date(&mut tx, event.room_id, event.date).await?;

        let exists: Option<ReservationId> =
            sqlx::query_scalar("SELECT reservation_id FROM reservations WHERE reservation_id = $1")
                .bind(event.reservation_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        if exists.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "reservation ({}) not found",
                event.reservation_id
            )));
        }

        self.check_room_bookable(&mut tx, event.room_id).await?;
        // The reservation being edited must not conflict with itself.
        self.check_no_overlap(
            &mut tx,
            event.room_id,
            event.date,
            event.start_time,
            event.end_time,
            Some(event.reservation_id),
        )
        .await?;

        // Status is intentionally not part of the SET list.
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET room_id = $2,
                    title = $3,
                    description = $4,
                    reserved_date = $5,
                    start_time = $6,
                    end_time = $7
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.room_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(event.start_time)
        .bind(event.end_time)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = $2
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.status)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "specified reservation not found".into(),
            ));
        }
        Ok(())
    }

    async fn delete(&self, event: DeleteReservation) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(event.reservation_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(
                "specified reservation not found".into(),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let row: Option<ReservationRow> =
            sqlx::query_as(&format!("{FIND_RESERVATION_SQL} WHERE r.reservation_id = $1"))
                .bind(reservation_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Reservation::from))
    }

    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            "{FIND_RESERVATION_SQL} WHERE r.room_id = $1 ORDER BY r.reserved_date ASC, r.start_time ASC"
        ))
        .bind(room_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            "{FIND_RESERVATION_SQL} WHERE r.user_id = $1 ORDER BY r.reserved_date ASC, r.start_time ASC"
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            "{FIND_RESERVATION_SQL} ORDER BY r.reserved_date ASC, r.start_time ASC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn reserved_intervals(
        &self,
        room_id: RoomId,
        date: NaiveDate,
    ) -> AppResult<Vec<(NaiveTime, NaiveTime)>> {
        let rows: Vec<IntervalRow> = sqlx::query_as(
            r#"
                SELECT start_time, end_time
                FROM reservations
                WHERE room_id = $1 AND reserved_date = $2
                ORDER BY start_time ASC, end_time ASC
            "#,
        )
        .bind(room_id)
        .bind(date)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(|r| (r.start_time, r.end_time)).collect())
    }

    async fn available_dates(
        &self,
        room_id: RoomId,
        from: NaiveDate,
        days: u32,
    ) -> AppResult<Vec<NaiveDate>> {
        let until = from + Duration::days(days as i64);
        let counts: Vec<DateCountRow> = sqlx::query_as(
            r#"
                SELECT reserved_date, COUNT(*) AS total
                FROM reservations
                WHERE room_id = $1
                  AND reserved_date >= $2
                  AND reserved_date < $3
                  AND status <> 'cancelled'
                GROUP BY reserved_date
            "#,
        )
        .bind(room_id)
        .bind(from)
        .bind(until)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // Capacity heuristic: a date is available while it holds fewer
        // reservations than a day has slots. It does not prove the remaining
        // slots are contiguous or even usable.
        let available = from
            .iter_days()
            .take(days as usize)
            .filter(|d| {
                counts
                    .iter()
                    .find(|c| c.reserved_date == *d)
                    .map_or(true, |c| c.total < slot::SLOTS_PER_DAY)
            })
            .collect();

        Ok(available)
    }
}

impl ReservationRepositoryImpl {
    async fn check_room_bookable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: RoomId,
    ) -> AppResult<()> {
        let is_active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM rooms WHERE room_id = $1")
                .bind(room_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

        match is_active {
            None => Err(AppError::EntityNotFound(format!(
                "room ({room_id}) not found"
            ))),
            Some(false) => Err(AppError::UnprocessableEntity(format!(
                "room ({room_id}) is not currently bookable"
            ))),
            Some(true) => Ok(()),
        }
    }

    // Half-open interval conflict scan. Cancelled reservations are excluded:
    // a cancelled booking must not keep blocking its old slot.
    async fn check_no_overlap(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: RoomId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_id: Option<ReservationId>,
    ) -> AppResult<()> {
        let conflict: Option<ReservationId> = sqlx::query_scalar(
            r#"
                SELECT reservation_id
                FROM reservations
                WHERE room_id = $1
                  AND reserved_date = $2
                  AND status <> 'cancelled'
                  AND start_time < $4
                  AND end_time > $3
                  AND ($5::uuid IS NULL OR reservation_id <> $5)
                LIMIT 1
            "#,
        )
        .bind(room_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(exclude_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        match conflict {
            Some(_) => Err(AppError::SlotConflict),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::room::RoomRepositoryImpl;
    use kernel::model::reservation::ReservationStatus;
    use kernel::model::room::event::CreateRoom;
    use kernel::repository::room::RoomRepository;
    use uuid::Uuid;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    async fn fixture_user(pool: &sqlx::PgPool) -> anyhow::Result<UserId> {
        let user_id = UserId::new();
        sqlx::query(
            r#"
                INSERT INTO users (user_id, user_name, email, password_hash, role)
                VALUES ($1, $2, $3, 'dummy', 'User')
            "#,
        )
        .bind(user_id)
        .bind(format!("user-{user_id}"))
        .bind(format!("{}@example.com", Uuid::new_v4().simple()))
        .execute(pool)
        .await?;
        Ok(user_id)
    }

    async fn fixture_room(pool: &sqlx::PgPool, is_active: bool) -> anyhow::Result<RoomId> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let room_id = repo
            .create(CreateRoom::new(
                format!("Room {}", Uuid::new_v4().simple()),
                10,
                "Test Location".into(),
                String::new(),
                is_active,
            ))
            .await?;
        Ok(room_id)
    }

    fn booking(
        room_id: RoomId,
        user_id: UserId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> CreateReservation {
        CreateReservation::new(
            room_id,
            user_id,
            "Team sync".into(),
            "".into(),
            date,
            start,
            end,
        )
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_admit_and_fetch_reservation(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let date = d(2026, 9, 1);
        let id = repo
            .create(booking(room_id, user_id, date, t(9, 0), t(10, 0)))
            .await?;

        let reservation = repo.find_by_id(id).await?.expect("reservation should exist");
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.date, date);
        assert_eq!(reservation.start_time, t(9, 0));
        assert_eq!(reservation.end_time, t(10, 0));
        assert_eq!(reservation.reserved_by.user_id, user_id);
        assert_eq!(reservation.room.room_id, room_id);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_overlapping_reservation_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let date = d(2026, 9, 1);
        repo.create(booking(room_id, user_id, date, t(9, 0), t(10, 0)))
            .await?;

        let res = repo
            .create(booking(room_id, user_id, date, t(9, 30), t(10, 30)))
            .await;
        assert!(matches!(res, Err(AppError::SlotConflict)));

        // The rejected request must leave no partial write behind.
        assert_eq!(repo.find_by_room_id(room_id).await?.len(), 1);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_touching_intervals_both_admitted(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let date = d(2026, 9, 1);
        repo.create(booking(room_id, user_id, date, t(9, 0), t(10, 0)))
            .await?;
        repo.create(booking(room_id, user_id, date, t(10, 0), t(11, 0)))
            .await?;

        assert_eq!(repo.find_by_room_id(room_id).await?.len(), 2);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_same_slot_free_on_other_room_or_date(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_a = fixture_room(&pool, true).await?;
        let room_b = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        repo.create(booking(room_a, user_id, d(2026, 9, 1), t(9, 0), t(10, 0)))
            .await?;
        // Same interval, different room.
        repo.create(booking(room_b, user_id, d(2026, 9, 1), t(9, 0), t(10, 0)))
            .await?;
        // Same interval and room, different date.
        repo.create(booking(room_a, user_id, d(2026, 9, 2), t(9, 0), t(10, 0)))
            .await?;

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_edit_revalidates_against_everything_but_itself(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let date = d(2026, 9, 1);
        let id = repo
            .create(booking(room_id, user_id, date, t(9, 0), t(10, 0)))
            .await?;
        repo.create(booking(room_id, user_id, date, t(11, 0), t(12, 0)))
            .await?;

        // Re-saving onto its own slot is fine.
        repo.update(UpdateReservation::new(
            id,
            room_id,
            "Team sync (renamed)".into(),
            "".into(),
            date,
            t(9, 0),
            t(10, 0),
        ))
        .await?;

        // Moving onto the other reservation is not.
        let res = repo
            .update(UpdateReservation::new(
                id,
                room_id,
                "Team sync".into(),
                "".into(),
                date,
                t(11, 30),
                t(12, 30),
            ))
            .await;
        assert!(matches!(res, Err(AppError::SlotConflict)));

        // Status must survive an edit untouched.
        let reservation = repo.find_by_id(id).await?.unwrap();
        assert_eq!(reservation.title, "Team sync (renamed)");
        assert_eq!(reservation.status, ReservationStatus::Pending);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_cancelled_reservation_frees_its_slot(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let date = d(2026, 9, 1);
        let id = repo
            .create(booking(room_id, user_id, date, t(9, 0), t(10, 0)))
            .await?;
        repo.update_status(UpdateReservationStatus::new(
            id,
            ReservationStatus::Cancelled,
        ))
        .await?;

        // The exact same slot can be booked again.
        repo.create(booking(room_id, user_id, date, t(9, 0), t(10, 0)))
            .await?;

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_status_change_is_idempotent(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let id = repo
            .create(booking(room_id, user_id, d(2026, 9, 1), t(9, 0), t(10, 0)))
            .await?;

        repo.update_status(UpdateReservationStatus::new(
            id,
            ReservationStatus::Confirmed,
        ))
        .await?;
        // Same status again still succeeds and changes nothing in business terms.
        repo.update_status(UpdateReservationStatus::new(
            id,
            ReservationStatus::Confirmed,
        ))
        .await?;

        let reservation = repo.find_by_id(id).await?.unwrap();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_inactive_room_not_bookable(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, false).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let res = repo
            .create(booking(room_id, user_id, d(2026, 9, 1), t(9, 0), t(10, 0)))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_slot_rules_enforced_at_admission(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let date = d(2026, 9, 1);
        let unaligned = repo
            .create(booking(room_id, user_id, date, t(9, 15), t(10, 0)))
            .await;
        assert!(matches!(unaligned, Err(AppError::SlotAlignment)));

        let early = repo
            .create(booking(room_id, user_id, date, t(8, 30), t(9, 30)))
            .await;
        assert!(matches!(early, Err(AppError::SlotOutOfHours)));

        let reversed = repo
            .create(booking(room_id, user_id, date, t(10, 0), t(10, 0)))
            .await;
        assert!(matches!(reversed, Err(AppError::SlotOrder)));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_reserved_intervals_ordered_by_start(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let date = d(2026, 9, 1);
        repo.create(booking(room_id, user_id, date, t(11, 0), t(12, 0)))
            .await?;
        repo.create(booking(room_id, user_id, date, t(9, 0), t(10, 0)))
            .await?;

        let intervals = repo.reserved_intervals(room_id, date).await?;
        assert_eq!(intervals, vec![(t(9, 0), t(10, 0)), (t(11, 0), t(12, 0))]);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_available_dates_capacity_heuristic(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = ReservationRepositoryImpl::new(ConnectionPool::new(pool));

        let from = d(2026, 9, 1);
        let full_day = d(2026, 9, 2);

        // Fill every slot of one day: 18 back-to-back half-hour bookings.
        let mut start = t(9, 0);
        for _ in 0..slot::SLOTS_PER_DAY {
            let end = start + Duration::minutes(30);
            repo.create(booking(room_id, user_id, full_day, start, end))
                .await?;
            start = end;
        }
        // One partial day for contrast.
        repo.create(booking(room_id, user_id, from, t(9, 0), t(10, 0)))
            .await?;

        let available = repo.available_dates(room_id, from, 30).await?;
        assert!(available.contains(&from));
        assert!(!available.contains(&full_day));
        assert!(available.contains(&d(2026, 9, 3)));
        assert_eq!(available.len(), 29);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_concurrent_admissions_admit_exactly_one(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let user_id = fixture_user(&pool).await?;
        let room_id = fixture_room(&pool, true).await?;
        let repo = Arc::new(ReservationRepositoryImpl::new(ConnectionPool::new(pool)));

        let date = d(2026, 9, 1);
        let a = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.create(booking(room_id, user_id, date, t(9, 0), t(10, 0)))
                    .await
            })
        };
        let b = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.create(booking(room_id, user_id, date, t(9, 0), t(10, 0)))
                    .await
            })
        };

        let (a, b) = tokio::join!(a, b);
        let results = [a?, b?];
        let oks = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(oks, 1, "exactly one of two identical admissions may win");
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AppError::SlotConflict))));

        Ok(())
    }
}
