//! Postgres repository implementation using Diesel.
//!
//! Tables: `activities`, `students` and the `activity_participants` join
//! table keyed by `(activity_id, student_id)`. The composite primary key is
//! what ultimately prevents duplicate signups when two requests race.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Retry with exponential backoff when checking out a connection
//! - One diesel transaction per unit of work
//! - Embedded migrations run at startup (idempotent)
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for connection checkout (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    DirectoryRepository, DirectorySession, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::{Activity, ActivityId, NewActivity, NewStudent, Participation, Student};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;
type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for connection checkout
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool, config })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Check out a pooled connection, retrying transient failures with
    /// exponential backoff. Blocking; call from `spawn_blocking` only.
    fn checkout(pool: &PgPool, config: &PostgresConfig) -> RepositoryResult<PgPooled> {
        let mut retry_delay = Duration::from_millis(config.retry_delay_ms);
        let mut attempt = 0;

        loop {
            match pool.get() {
                Ok(conn) => return Ok(conn),
                Err(e) if attempt < config.max_retries => {
                    log::warn!(
                        "connection checkout failed (attempt {}): {}",
                        attempt + 1,
                        e
                    );
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(RepositoryError::connection_with_context(
                        e.to_string(),
                        ErrorContext::new("get_connection")
                            .with_details(format!("attempt={}", attempt + 1)),
                    ))
                }
            }
        }
    }
}

/// Failure inside a diesel transaction: either the unit of work rejected the
/// operation, or diesel itself failed (including on commit).
enum TxError<E> {
    Work(E),
    Database(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for TxError<E> {
    fn from(err: diesel::result::Error) -> Self {
        TxError::Database(err)
    }
}

#[async_trait]
impl DirectoryRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let pool = self.pool.clone();
        let config = self.config.clone();

        task::spawn_blocking(move || {
            let mut pooled = Self::checkout(&pool, &config)?;
            let conn: &mut PgConnection = &mut pooled;
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<RepositoryError> + Send + 'static,
        F: FnOnce(&mut dyn DirectorySession) -> Result<T, E> + Send + 'static,
    {
        let pool = self.pool.clone();
        let config = self.config.clone();

        let joined = task::spawn_blocking(move || -> Result<T, E> {
            let mut pooled = Self::checkout(&pool, &config)?;
            let conn: &mut PgConnection = &mut pooled;

            let outcome = conn.transaction::<T, TxError<E>, _>(|tx| {
                work(&mut PgSession { conn: tx }).map_err(TxError::Work)
            });

            match outcome {
                Ok(value) => Ok(value),
                Err(TxError::Work(e)) => Err(e),
                Err(TxError::Database(e)) => Err(E::from(
                    RepositoryError::from(e).with_operation("transaction"),
                )),
            }
        })
        .await;

        joined.map_err(|e| {
            E::from(RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            ))
        })?
    }
}

/// Session bound to one connection that is inside an open transaction.
struct PgSession<'a> {
    conn: &'a mut PgConnection,
}

impl DirectorySession for PgSession<'_> {
    fn list_activities(&mut self) -> RepositoryResult<Vec<Activity>> {
        let rows = activities::table
            .select(ActivityRow::as_select())
            .order(activities::id.asc())
            .load::<ActivityRow>(self.conn)?;
        Ok(rows.into_iter().map(Activity::from).collect())
    }

    fn find_activity(&mut self, name: &str) -> RepositoryResult<Option<Activity>> {
        let row = activities::table
            .filter(activities::name.eq(name))
            .select(ActivityRow::as_select())
            .first::<ActivityRow>(self.conn)
            .optional()?;
        Ok(row.map(Activity::from))
    }

    fn insert_activity(&mut self, activity: &NewActivity) -> RepositoryResult<Activity> {
        let row = diesel::insert_into(activities::table)
            .values(&NewActivityRow {
                name: &activity.name,
                description: &activity.description,
                schedule: &activity.schedule,
                max_participants: activity.max_participants,
            })
            .returning(ActivityRow::as_returning())
            .get_result::<ActivityRow>(self.conn)
            .map_err(|e| RepositoryError::from(e).with_operation("insert_activity"))?;
        Ok(row.into())
    }

    fn participants(&mut self, activity_id: ActivityId) -> RepositoryResult<Vec<Student>> {
        let rows = activity_participants::table
            .inner_join(students::table)
            .filter(activity_participants::activity_id.eq(activity_id.value()))
            .select(StudentRow::as_select())
            .order(students::id.asc())
            .load::<StudentRow>(self.conn)?;
        Ok(rows.into_iter().map(Student::from).collect())
    }

    fn find_student(&mut self, email: &str) -> RepositoryResult<Option<Student>> {
        let row = students::table
            .filter(students::email.eq(email))
            .select(StudentRow::as_select())
            .first::<StudentRow>(self.conn)
            .optional()?;
        Ok(row.map(Student::from))
    }

    fn insert_or_get_student(&mut self, student: &NewStudent) -> RepositoryResult<Student> {
        // A concurrent signup may have committed this email after our
        // find_student; the insert then does nothing and the re-select
        // sees the committed row.
        let inserted = diesel::insert_into(students::table)
            .values(&NewStudentRow {
                name: &student.name,
                email: &student.email,
                grade_level: &student.grade_level,
            })
            .on_conflict(students::email)
            .do_nothing()
            .returning(StudentRow::as_returning())
            .get_result::<StudentRow>(self.conn)
            .optional()
            .map_err(|e| RepositoryError::from(e).with_operation("insert_or_get_student"))?;

        match inserted {
            Some(row) => Ok(row.into()),
            None => self.find_student(&student.email)?.ok_or_else(|| {
                RepositoryError::internal_with_context(
                    "Student vanished after email conflict",
                    ErrorContext::new("insert_or_get_student")
                        .with_entity("student")
                        .with_entity_id(&student.email),
                )
            }),
        }
    }

    fn is_participant(&mut self, edge: Participation) -> RepositoryResult<bool> {
        let exists = diesel::select(diesel::dsl::exists(
            activity_participants::table
                .filter(activity_participants::activity_id.eq(edge.activity_id.value()))
                .filter(activity_participants::student_id.eq(edge.student_id.value())),
        ))
        .get_result::<bool>(self.conn)?;
        Ok(exists)
    }

    fn add_participant(&mut self, edge: Participation) -> RepositoryResult<()> {
        diesel::insert_into(activity_participants::table)
            .values(ParticipationRow::from(edge))
            .execute(self.conn)
            .map_err(|e| RepositoryError::from(e).with_operation("add_participant"))?;
        Ok(())
    }

    fn remove_participant(&mut self, edge: Participation) -> RepositoryResult<bool> {
        let removed = diesel::delete(
            activity_participants::table
                .filter(activity_participants::activity_id.eq(edge.activity_id.value()))
                .filter(activity_participants::student_id.eq(edge.student_id.value())),
        )
        .execute(self.conn)?;
        Ok(removed > 0)
    }
}
