pub mod reservation;
pub mod room;
pub mod user;
