use strum::{AsRefStr, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, EnumIter, sqlx::Type)]
#[sqlx(type_name = "role_name", rename_all = "PascalCase")]
pub enum Role {
    Admin,
    User,
}
