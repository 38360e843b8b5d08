//! Repository implementations module.
//!
//! This module contains the implementations of [`DirectoryRepository`]:
//! - `postgres`: PostgreSQL implementation with Diesel ORM
//! - `local`: In-memory implementation for unit testing and local development
//!
//! [`AnyRepository`] selects between them at runtime.
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresConfig, PostgresRepository};

use async_trait::async_trait;

use super::repository::{DirectoryRepository, DirectorySession, RepositoryError, RepositoryResult};

/// Runtime-selected repository backend.
///
/// `DirectoryRepository` has a generic unit-of-work method and cannot be
/// used as a trait object, so backends chosen from configuration are wrapped
/// in this enum instead.
#[derive(Clone)]
pub enum AnyRepository {
    Local(LocalRepository),
    #[cfg(feature = "postgres-repo")]
    Postgres(PostgresRepository),
}

impl AnyRepository {
    /// Short backend name for logs and health output.
    pub fn backend_name(&self) -> &'static str {
        match self {
            AnyRepository::Local(_) => "local",
            #[cfg(feature = "postgres-repo")]
            AnyRepository::Postgres(_) => "postgres",
        }
    }
}

impl From<LocalRepository> for AnyRepository {
    fn from(repo: LocalRepository) -> Self {
        AnyRepository::Local(repo)
    }
}

#[cfg(feature = "postgres-repo")]
impl From<PostgresRepository> for AnyRepository {
    fn from(repo: PostgresRepository) -> Self {
        AnyRepository::Postgres(repo)
    }
}

#[async_trait]
impl DirectoryRepository for AnyRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        match self {
            AnyRepository::Local(repo) => repo.health_check().await,
            #[cfg(feature = "postgres-repo")]
            AnyRepository::Postgres(repo) => repo.health_check().await,
        }
    }

    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<RepositoryError> + Send + 'static,
        F: FnOnce(&mut dyn DirectorySession) -> Result<T, E> + Send + 'static,
    {
        match self {
            AnyRepository::Local(repo) => repo.transaction(work).await,
            #[cfg(feature = "postgres-repo")]
            AnyRepository::Postgres(repo) => repo.transaction(work).await,
        }
    }
}
