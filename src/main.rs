use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use eva_survey::auth::password;
use eva_survey::config::AppConfig;
use eva_survey::{db, handlers};

fn to_io<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> std::io::Error + '_ {
    move |e| std::io::Error::other(format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(to_io("Invalid configuration"))?;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .map_err(to_io("Failed to connect to database"))?;
    db::run_migrations(&pool)
        .await
        .map_err(to_io("Failed to run migrations"))?;

    let admin_hash = password::hash_password(&config.admin_password)
        .map_err(to_io("Failed to hash default password"))?;
    db::seed_admin(&pool, &config.admin_username, &admin_hash)
        .await
        .map_err(to_io("Failed to seed administrator"))?;

    // Session encryption key: load from SESSION_KEY for sessions that survive restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = config.bind_addr.clone();
    let cookie_secure = config.cookie_secure;
    let config = web::Data::new(config);
    let pool = web::Data::new(pool);

    log::info!("Starting server at http://{}", bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(pool.clone())
            .app_data(config.clone())
            .configure(handlers::configure)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "error": "not_found",
                    "message": "No such route",
                }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
