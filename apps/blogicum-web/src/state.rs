//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PasswordService, PostRepository,
    TokenService, UserRepository,
};
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub page_size: u64,
    pub secure_cookies: bool,
    /// Name of the storage backend, reported by `/health`.
    pub backend: &'static str,
}

/// Repositories for one storage backend.
struct Repositories {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
    backend: &'static str,
}

impl Repositories {
    fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            categories: Arc::new(store.categories()),
            locations: Arc::new(store.locations()),
            backend: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: blogicum_infra::database::DbConn) -> Self {
        use blogicum_infra::database::{
            PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
            PostgresPostRepository, PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            locations: Arc::new(PostgresLocationRepository::new(db)),
            backend: "postgres",
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let repos = match config.database() {
            Some(db_config) => match blogicum_infra::database::connect(&db_config).await {
                Ok(db) => Repositories::postgres(db),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Repositories::in_memory(&InMemoryStore::new())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory(&InMemoryStore::new())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            if config.database_url.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory(&InMemoryStore::new())
        };

        config.warn_on_default_secret();
        tracing::info!(backend = repos.backend, "Application state initialized");

        Self::assemble(
            repos,
            config.session.clone(),
            config.page_size,
            config.secure_cookies,
        )
    }

    /// State over an existing in-memory store.
    #[cfg(test)]
    pub fn in_memory(store: &InMemoryStore, session: JwtConfig, page_size: u64) -> Self {
        Self::assemble(Repositories::in_memory(store), session, page_size, false)
    }

    fn assemble(
        repos: Repositories,
        session: JwtConfig,
        page_size: u64,
        secure_cookies: bool,
    ) -> Self {
        Self {
            users: repos.users,
            posts: repos.posts,
            comments: repos.comments,
            categories: repos.categories,
            locations: repos.locations,
            tokens: Arc::new(JwtTokenService::new(session)),
            passwords: Arc::new(Argon2PasswordService::new()),
            page_size,
            secure_cookies,
            backend: repos.backend,
        }
    }
}
