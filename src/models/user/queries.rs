use sqlx::PgPool;

use super::types::{NewUser, User, UserDisplay};

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password, display_name FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_display_by_id(pool: &PgPool, id: i64) -> Result<Option<UserDisplay>, sqlx::Error> {
    sqlx::query_as::<_, UserDisplay>("SELECT id, username, display_name FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Create a user, returning the new id.
pub async fn create(pool: &PgPool, new: &NewUser) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO users (username, password, display_name) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&new.username)
    .bind(&new.password)
    .bind(&new.display_name)
    .fetch_one(pool)
    .await
}

/// Grant a role to a user. Granting an already held role is a no-op.
pub async fn assign_role(pool: &PgPool, user_id: i64, role_name: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_roles (user_id, role_name) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(role_name)
    .execute(pool)
    .await?;
    Ok(())
}

/// Role names held by a user, sorted.
pub async fn find_role_names(pool: &PgPool, user_id: i64) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT role_name FROM user_roles WHERE user_id = $1 ORDER BY role_name")
        .bind(user_id)
        .fetch_all(pool)
        .await
}
