pub mod event;

use crate::model::id::RoomId;

#[derive(Debug, Clone)]
pub struct Room {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub location: String,
    pub description: String,
    pub is_active: bool,
}
