//! Repository trait definitions for the activity directory.
//!
//! Storage is split into two seams:
//!
//! - [`DirectorySession`]: the reads and writes available inside one unit of
//!   work. Implementations operate on a connection (Postgres) or on a staged
//!   copy of the data (local), never on shared state directly.
//! - [`DirectoryRepository`]: opens a unit of work, hands a session to a
//!   closure and commits only if the closure returns `Ok`.
//!
//! ```ignore
//! let emails = repo
//!     .transaction(|session| -> Result<Vec<String>, RepositoryError> {
//!         let chess = session.find_activity("Chess Club")?;
//!         // ...
//!         Ok(vec![])
//!     })
//!     .await?;
//! ```

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{Activity, ActivityId, NewActivity, NewStudent, Participation, Student};

/// Operations available inside a single unit of work.
///
/// All writes are provisional until the enclosing
/// [`DirectoryRepository::transaction`] commits.
pub trait DirectorySession {
    /// All activities, ordered by ID.
    fn list_activities(&mut self) -> RepositoryResult<Vec<Activity>>;

    /// Look up an activity by its exact name.
    fn find_activity(&mut self, name: &str) -> RepositoryResult<Option<Activity>>;

    /// Insert a new activity.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ConflictError)` - If the name is already taken
    fn insert_activity(&mut self, activity: &NewActivity) -> RepositoryResult<Activity>;

    /// Students signed up for an activity, ordered by student ID.
    fn participants(&mut self, activity_id: ActivityId) -> RepositoryResult<Vec<Student>>;

    /// Look up a student by exact email.
    fn find_student(&mut self, email: &str) -> RepositoryResult<Option<Student>>;

    /// Insert a new student, or return the stored row if the email is taken.
    ///
    /// An existing row is never updated. The email may have been committed by
    /// another unit of work after this one called [`find_student`].
    ///
    /// [`find_student`]: DirectorySession::find_student
    fn insert_or_get_student(&mut self, student: &NewStudent) -> RepositoryResult<Student>;

    /// Whether the association edge exists.
    fn is_participant(&mut self, edge: Participation) -> RepositoryResult<bool>;

    /// Insert the association edge.
    ///
    /// # Returns
    /// * `Err(RepositoryError::ConflictError)` - If the pair already exists
    /// * `Err(RepositoryError::ValidationError)` - If either endpoint is missing
    fn add_participant(&mut self, edge: Participation) -> RepositoryResult<()>;

    /// Delete the association edge, leaving both endpoints in place.
    ///
    /// Returns `true` if an edge was removed.
    fn remove_participant(&mut self, edge: Participation) -> RepositoryResult<bool>;
}

/// Storage backend able to run units of work.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Run `work` inside one unit of work.
    ///
    /// The session is released on every exit path. Writes made through it
    /// are committed when `work` returns `Ok` and discarded when it returns
    /// `Err`. Storage failures opening or committing the unit of work are
    /// converted into `E`.
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<RepositoryError> + Send + 'static,
        F: FnOnce(&mut dyn DirectorySession) -> Result<T, E> + Send + 'static;
}
