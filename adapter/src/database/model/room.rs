use kernel::model::{id::RoomId, room::Room};

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub location: String,
    pub description: String,
    pub is_active: bool,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            room_id,
            name,
            capacity,
            location,
            description,
            is_active,
        } = value;
        Room {
            room_id,
            name,
            capacity,
            location,
            description,
            is_active,
        }
    }
}
