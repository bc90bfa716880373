use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::errors::AppError;
use crate::models::user::{self, NewUser};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the first administrator when the database has no users yet.
/// Returns the new user id, or None when users already exist.
pub async fn seed_admin(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<Option<i64>, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        log::info!("Database already seeded ({} users), skipping admin seed", count);
        return Ok(None);
    }

    let new = NewUser {
        username: username.to_string(),
        password: password_hash.to_string(),
        display_name: "Administrator".to_string(),
    };
    let user_id = user::create(pool, &new).await?;
    user::assign_role(pool, user_id, "admin").await?;
    log::info!("Seeded administrator '{}'", username);
    Ok(Some(user_id))
}
