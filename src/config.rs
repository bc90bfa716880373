use std::env;

/// Runtime configuration read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Base URL used to build public survey links.
    pub public_url: String,
    pub db_max_connections: u32,
    pub session_key: Option<String>,
    pub cookie_secure: bool,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(val) => val
                .parse::<u32>()
                .map_err(|e| format!("DB_MAX_CONNECTIONS is not a number: {e}"))?,
            Err(_) => 8,
        };

        Ok(AppConfig {
            database_url,
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:8080"),
            public_url: env_or("PUBLIC_URL", "http://127.0.0.1:8080"),
            db_max_connections,
            session_key: env::var("SESSION_KEY").ok(),
            cookie_secure: parse_flag(&env_or("COOKIE_SECURE", "false")),
            admin_username: env_or("ADMIN_USERNAME", "admin"),
            admin_password: env_or("ADMIN_PASSWORD", "admin123"),
        })
    }
}

/// Public link for a published instance.
pub fn build_survey_link(public_url: &str, slug: &str) -> String {
    format!("{}/s/{}", public_url.trim_end_matches('/'), slug)
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
