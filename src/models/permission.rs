use sqlx::PgPool;

/// Permission codes (`<entity_type>.<action>`) granted to a user through any of
/// their roles, de-duplicated and sorted.
pub async fn find_codes_by_user_id(pool: &PgPool, user_id: i64) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT DISTINCT rp.entity_type || '.' || rp.action AS code \
         FROM user_roles ur \
         JOIN role_permissions rp ON rp.role_name = ur.role_name \
         WHERE ur.user_id = $1 \
         ORDER BY code",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Grant `<entity_type>.<action>` to a role.
pub async fn grant(pool: &PgPool, role_name: &str, entity_type: &str, action: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO role_permissions (role_name, entity_type, action) VALUES ($1, $2, $3) \
         ON CONFLICT DO NOTHING",
    )
    .bind(role_name)
    .bind(entity_type)
    .bind(action)
    .execute(pool)
    .await?;
    Ok(())
}
