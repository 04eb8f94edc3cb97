use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_logging: bool,

    // Server
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        Ok(Self {
            // Database
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://knot.db?mode=rwc".to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("DB_MAX_CONNECTIONS"))?,
            db_logging: parse_bool(&env::var("DB_LOGGING").unwrap_or_else(|_| "false".to_string()))
                .ok_or(ConfigError::Invalid("DB_LOGGING"))?,

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
        })
    }

    /// Configuration for a throwaway in-memory database
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            db_logging: false,
            host: "localhost".to_string(),
            port: 0,
        }
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
