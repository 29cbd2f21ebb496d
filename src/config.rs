use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://insurance.db".to_string())
                .trim()
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
        };

        if config.database_url.is_empty() {
            anyhow::bail!("DATABASE_URL cannot be empty");
        }
        if !config.database_url.starts_with("sqlite:") {
            anyhow::bail!("DATABASE_URL must start with sqlite:");
        }

        tracing::debug!("Database URL: {}", config.database_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Configuration for tests: in-memory database, arbitrary port.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
        }
    }
}
