/// Configuration management
///
/// Loads the store configuration from environment variables, with `.env`
/// support for development.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool upper bound (default: 10)
/// - `DATABASE_MIN_CONNECTIONS`: idle connections kept warm (default: 2)
/// - `DATABASE_CONNECT_TIMEOUT_SECONDS`: pool acquire timeout (default: 30)
///
/// # Example
///
/// ```no_run
/// use souschef_store::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Connecting to {}", config.database.url);
/// # Ok(())
/// # }
/// ```
use std::env;

use crate::db::pool::DatabaseConfig;

/// Complete store configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection pool configuration
    pub database: DatabaseConfig,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric variable
    /// does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let min_connections = env::var("DATABASE_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "2".to_string())
            .parse::<u32>()?;

        let connect_timeout_seconds = env::var("DATABASE_CONNECT_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()?;

        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be greater than zero");
        }

        Ok(Self {
            database: DatabaseConfig {
                url,
                max_connections,
                min_connections,
                connect_timeout_seconds,
                ..DatabaseConfig::default()
            },
        })
    }
}
