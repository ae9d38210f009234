use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::RoomId,
        room::{
            event::{CreateRoom, DeleteRoom, UpdateRoom},
            Room,
        },
    },
    repository::room::RoomRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::room::RoomRow, ConnectionPool};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId> {
        let room_id = RoomId::new();
        sqlx::query(
            r#"
                INSERT INTO rooms (room_id, name, capacity, location, description, is_active)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(room_id)
        .bind(&event.name)
        .bind(event.capacity)
        .bind(&event.location)
        .bind(&event.description)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(room_id)
    }

    async fn find_active_all(&self) -> AppResult<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            r#"
                SELECT room_id, name, capacity, location, description, is_active
                FROM rooms
                WHERE is_active = TRUE
                ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        let row: Option<RoomRow> = sqlx::query_as(
            r#"
                SELECT room_id, name, capacity, location, description, is_active
                FROM rooms
                WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Room::from))
    }

    async fn update(&self, event: UpdateRoom) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE rooms
                SET name = COALESCE($2, name),
                    capacity = COALESCE($3, capacity),
                    location = COALESCE($4, location),
                    description = COALESCE($5, description),
                    is_active = COALESCE($6, is_active)
                WHERE room_id = $1
            "#,
        )
        .bind(event.room_id)
        .bind(event.name)
        .bind(event.capacity)
        .bind(event.location)
        .bind(event.description)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified room not found".into()));
        }
        Ok(())
    }

    async fn delete(&self, event: DeleteRoom) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                DELETE FROM rooms WHERE room_id = $1
            "#,
        )
        .bind(event.room_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified room not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../migrations")]
    async fn test_register_and_fetch_room(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));

        let room_id = repo
            .create(CreateRoom::new(
                "Room Z".into(),
                12,
                "Third Floor".into(),
                "Workshop room".into(),
                true,
            ))
            .await?;

        let room = repo.find_by_id(room_id).await?.expect("room should exist");
        assert_eq!(room.name, "Room Z");
        assert_eq!(room.capacity, 12);
        assert_eq!(room.location, "Third Floor");
        assert!(room.is_active);

        let active = repo.find_active_all().await?;
        assert!(active.iter().any(|r| r.room_id == room_id));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_deactivated_room_leaves_listing(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));

        let room_id = repo
            .create(CreateRoom::new(
                "Room Y".into(),
                4,
                "Basement".into(),
                String::new(),
                true,
            ))
            .await?;

        repo.update(UpdateRoom {
            room_id,
            name: None,
            capacity: None,
            location: None,
            description: None,
            is_active: Some(false),
        })
        .await?;

        let active = repo.find_active_all().await?;
        assert!(active.iter().all(|r| r.room_id != room_id));

        Ok(())
    }
}
