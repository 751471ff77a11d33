//! Application state - shared across all handlers.

use std::sync::Arc;

use blogflow_core::domain::{NewUser, User, normalize_email};
use blogflow_core::ports::{
    BaseRepository, PasswordService, PostStore, TokenService, UserRepository,
};
use blogflow_core::services::PostService;
use blogflow_core::{DomainError, PostWorkflow};
use blogflow_infra::database::DatabaseConfig;
use blogflow_infra::{
    Argon2PasswordService, InMemoryPostStore, InMemoryUserRepository, JwtConfig, JwtTokenService,
    TracingNotifier,
};

#[cfg(feature = "postgres")]
use blogflow_infra::database::{DatabaseConnections, PostgresPostStore, PostgresUserRepository};

use crate::config::AdminSeed;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: PostService,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, jwt: JwtConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (db, users, posts): (
            Option<Arc<DatabaseConnections>>,
            Arc<dyn UserRepository>,
            Arc<dyn PostStore>,
        ) = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections);
                    let users: Arc<dyn UserRepository> =
                        Arc::new(PostgresUserRepository::new(conn.main.clone()));
                    let posts: Arc<dyn PostStore> =
                        Arc::new(PostgresPostStore::new(conn.main.clone()));
                    (Some(conn), users, posts)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, in_memory_users(), in_memory_posts())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, in_memory_users(), in_memory_posts())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (users, posts) = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (in_memory_users(), in_memory_posts())
        };

        let state = Self {
            users,
            posts: PostService::new(posts, PostWorkflow::with_hook(Arc::new(TracingNotifier))),
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            #[cfg(feature = "postgres")]
            db,
        };

        tracing::info!("Application state initialized");
        state
    }

    /// State backed by in-memory stores only.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self {
            users: in_memory_users(),
            posts: PostService::new(in_memory_posts(), PostWorkflow::new()),
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Create the configured superuser unless an account with that email exists.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> Result<(), DomainError> {
        let email = normalize_email(&seed.email);
        if self.users.find_by_email(&email).await?.is_some() {
            tracing::debug!("Admin account already present");
            return Ok(());
        }

        let hash = self
            .passwords
            .hash(&seed.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let admin = User::new_superuser(
            NewUser {
                email,
                username: seed.username.clone(),
                first_name: "Site".to_string(),
                last_name: "Admin".to_string(),
                phone_number: String::new(),
            },
            hash,
        );
        let admin = self.users.save(admin).await?;

        tracing::info!(user_id = %admin.id, "Admin account created");
        Ok(())
    }
}

fn in_memory_users() -> Arc<dyn UserRepository> {
    Arc::new(InMemoryUserRepository::new())
}

fn in_memory_posts() -> Arc<dyn PostStore> {
    Arc::new(InMemoryPostStore::new())
}
