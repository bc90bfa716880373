//! Shared test infrastructure.
//!
//! Database tests run under `#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]`,
//! which gives each test a fresh migrated database on the server named by
//! `DATABASE_URL` and drops it afterwards.
//!
//! - `create_user()` / `viewer_for()` - users with roles and the `Viewer`
//!   a signed-in session would produce.

#![allow(dead_code)]

use sqlx::PgPool;

use eva_survey::auth::session::{AuthUser, Permissions, Viewer};
use eva_survey::models::question::{NewQuestion, QuestionType};
use eva_survey::models::template::NewTemplate;
use eva_survey::models::{permission, user};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin123";
pub const PUBLIC_URL: &str = "http://surveys.test";

// ============================================================================
// USERS
// ============================================================================

/// Insert a user holding `roles`. The password hash is a fixed placeholder;
/// use `password::hash_password` where a login is exercised.
pub async fn create_user(pool: &PgPool, username: &str, roles: &[&str]) -> i64 {
    let id = user::create(
        pool,
        &user::NewUser {
            username: username.to_string(),
            password: "$argon2id$placeholder".to_string(),
            display_name: username.to_string(),
        },
    )
    .await
    .expect("create user");
    for role in roles {
        user::assign_role(pool, id, role).await.expect("assign role");
    }
    id
}

/// The viewer a login for `user_id` would put in the session.
pub async fn viewer_for(pool: &PgPool, user_id: i64) -> Viewer {
    let found = user::find_display_by_id(pool, user_id)
        .await
        .expect("query user")
        .expect("user exists");
    let roles = user::find_role_names(pool, user_id).await.expect("roles");
    let perms = permission::find_codes_by_user_id(pool, user_id).await.expect("perms");
    Viewer::user(AuthUser {
        id: found.id,
        username: found.username,
        roles: Permissions(roles),
        permissions: Permissions(perms),
    })
}

pub async fn admin_viewer(pool: &PgPool, username: &str) -> Viewer {
    let id = create_user(pool, username, &["admin"]).await;
    viewer_for(pool, id).await
}

pub async fn respondent_viewer(pool: &PgPool, username: &str) -> Viewer {
    let id = create_user(pool, username, &["respondent"]).await;
    viewer_for(pool, id).await
}

// ============================================================================
// TEMPLATES
// ============================================================================

pub fn question(text: &str, question_type: QuestionType, options: &[&str], required: bool) -> NewQuestion {
    NewQuestion {
        text: text.to_string(),
        question_type,
        options: options.iter().map(|s| s.to_string()).collect(),
        required,
    }
}

/// Two questions: a required text question and an optional single choice.
pub fn two_question_template(title: &str) -> NewTemplate {
    NewTemplate {
        title: title.to_string(),
        description: "Worked example".to_string(),
        questions: vec![
            question("What is your name?", QuestionType::Text, &[], true),
            question("Favourite colour", QuestionType::SingleChoice, &["Red", "Green", "Blue"], false),
        ],
    }
}
