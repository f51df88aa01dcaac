use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Max connections in the MySQL pool
    pub db_max_connections: u32,
    /// Seconds to wait for the initial connection
    pub db_connect_timeout_secs: u64,
    /// Seconds to wait when acquiring a pooled connection
    pub db_acquire_timeout_secs: u64,
    /// Port the HTTP listener binds to
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
            db_connect_timeout_secs: parse_or("DB_CONNECT_TIMEOUT_SECS", 10),
            db_acquire_timeout_secs: parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5),
            port: parse_or("PORT", 8080),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
