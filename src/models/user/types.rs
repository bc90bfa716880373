use serde::Serialize;

/// Internal user row for authentication, includes the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub display_name: String,
}

/// Safe version for API responses.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserDisplay {
    pub id: i64,
    pub username: String,
    pub display_name: String,
}

/// New user data for creation. `password` is already hashed.
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
}
