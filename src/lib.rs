//! User Accounts API
//!
//! A CRUD service for a `User` resource, built as a domain core of
//! validated value objects and an aggregate behind a repository port,
//! with in-memory and PostgreSQL persistence adapters.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::{AppState, UserServiceTrait};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
///
/// With `database.url` set the service persists to PostgreSQL; without
/// it, users live in memory for the lifetime of the process.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(Argon2Hasher::new());

    let user_service: Arc<dyn UserServiceTrait> = match &config.database.url {
        Some(url) => {
            info!("Connecting to PostgreSQL...");

            let mut options = sqlx::postgres::PgPoolOptions::new();
            if let Some(max_connections) = config.database.max_connections {
                options = options.max_connections(max_connections);
            }

            let pool = options
                .connect(url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;

            info!("PostgreSQL connection established");

            let repository = PostgresUserRepository::new(pool);
            repository.migrate().await?;

            Arc::new(UserService::new(Arc::new(repository), hasher))
        }
        None => {
            info!("Using in-memory user repository");
            Arc::new(UserService::new(
                Arc::new(InMemoryUserRepository::new()),
                hasher,
            ))
        }
    };

    Ok(AppState::new(user_service))
}
