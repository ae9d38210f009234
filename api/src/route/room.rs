use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    availability::{available_dates, reserved_times},
    reservation::{reserve_room, show_room_reservations},
    room::{delete_room, register_room, show_room, show_room_list, update_room},
};

pub fn build_room_routers() -> Router<AppRegistry> {
    let room_routers = Router::new()
        .route("/", post(register_room))
        .route("/", get(show_room_list))
        .route("/:room_id", get(show_room))
        .route("/:room_id", put(update_room))
        .route("/:room_id", delete(delete_room))
        .route("/:room_id/reservations", get(show_room_reservations))
        .route("/:room_id/reservations", post(reserve_room))
        .route("/:room_id/reserved-times", get(reserved_times))
        .route("/:room_id/available-dates", get(available_dates));

    Router::new().nest("/rooms", room_routers)
}
