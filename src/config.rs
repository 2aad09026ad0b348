use std::env;
use std::net::SocketAddr;

pub const PORT: u16 = 8000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://codigo.db";
pub const DEFAULT_LOG_FILTER: &str = "codigo=debug,tower_http=info";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub addr: SocketAddr,
}

impl Config {
    /// Reads `.env` if present. Only the database location comes from the
    /// environment; the port is fixed.
    pub fn new_from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::with_database_url(env::var("DATABASE_URL").ok())
    }

    /// Defaults, with `database_url` replaced when a non-blank value is given.
    pub fn with_database_url(database_url: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
            config.database_url = url;
        }
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            addr: SocketAddr::from(([127, 0, 0, 1], PORT)),
        }
    }
}

pub fn log_filter() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}
