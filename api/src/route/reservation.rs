use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    reservation::{
        admin_reserve_room, delete_reservation, show_all_reservations, show_my_reservations,
        show_reservation, update_reservation, update_reservation_status,
    },
    user::{show_current_user, show_user_list},
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/", get(show_all_reservations))
        .route("/", post(admin_reserve_room))
        .route("/me", get(show_my_reservations))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id", put(update_reservation))
        .route("/:reservation_id", delete(delete_reservation))
        .route("/:reservation_id/status", put(update_reservation_status));

    Router::new().nest("/reservations", reservation_routers)
}

pub fn build_user_routers() -> Router<AppRegistry> {
    let user_routers = Router::new()
        .route("/", get(show_user_list))
        .route("/me", get(show_current_user));

    Router::new().nest("/users", user_routers)
}
