use crate::model::id::RoomId;
use derive_new::new;

#[derive(new)]
pub struct CreateRoom {
    pub name: String,
    pub capacity: i32,
    pub location: String,
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct UpdateRoom {
    pub room_id: RoomId,
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug)]
pub struct DeleteRoom {
    pub room_id: RoomId,
}
