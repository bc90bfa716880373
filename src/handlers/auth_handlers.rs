use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::OnceLock;

use crate::auth::password;
use crate::auth::session::{AuthUser, Permissions, Viewer, store_login};
use crate::errors::AppError;
use crate::models::{permission, user};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Hash checked when the username does not exist.
fn unknown_user_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| password::hash_password("unknown-user-placeholder").unwrap_or_default())
}

/// POST /api/login
pub async fn login(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Json<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let invalid = || AppError::AuthenticationRequired("Invalid username or password".to_string());

    let Some(found) = user::find_by_username(&pool, form.username.trim()).await? else {
        // Same argon2 cost as a wrong password for a known user.
        let _ = password::verify_password(&form.password, unknown_user_hash());
        log::warn!("Login failed for unknown user '{}'", form.username.trim());
        return Err(invalid());
    };

    if !password::verify_password(&form.password, &found.password)? {
        log::warn!("Login failed for '{}'", found.username);
        return Err(invalid());
    }

    let roles = user::find_role_names(&pool, found.id).await?;
    let perms = permission::find_codes_by_user_id(&pool, found.id).await?;
    let auth_user = AuthUser {
        id: found.id,
        username: found.username,
        roles: Permissions(roles),
        permissions: Permissions(perms),
    };
    store_login(&session, &auth_user)?;
    log::info!("User '{}' signed in", auth_user.username);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": auth_user,
    })))
}

/// POST /api/logout
pub async fn logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

/// GET /api/me - The identity operations will see for this session.
pub async fn me(session: Session) -> Result<HttpResponse, AppError> {
    let viewer = Viewer::from_session(&session)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "authenticated": !viewer.is_guest(),
        "user": viewer.auth_user(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_hash_is_a_real_argon2_hash() {
        let hash = unknown_user_hash();
        assert!(hash.starts_with("$argon2"));
        assert!(!password::verify_password("anything", hash).unwrap());
        assert!(std::ptr::eq(hash, unknown_user_hash()));
    }
}
