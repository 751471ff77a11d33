use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    /// Log every SQL statement through `tracing`.
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 100,
            min_connections: 10,
            connect_timeout: Duration::from_secs(10),
            sqlx_logging: true,
        }
    }
}

/// Connection pool for the blog database.
///
/// # Example
/// ```ignore
/// let db = DatabaseConnections::init(&config).await?;
/// let posts = PostgresPostStore::new(db.main.clone());
/// ```
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: DbConn,
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connections...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(config.sqlx_logging)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!("Database connected (pool: {})", config.max_connections);

        Ok(Self { main })
    }

    /// Check that the database answers.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.main.ping().await
    }
}
