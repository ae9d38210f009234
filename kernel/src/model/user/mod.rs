use crate::model::{id::UserId, role::Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User facts carried on a reservation listing row.
#[derive(Debug, Clone)]
pub struct ReservationUser {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
}
