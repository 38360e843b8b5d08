//! In-memory local repository implementation.
//!
//! This module provides a local implementation of the repository traits
//! suitable for unit testing and local development. Entities live in ordered
//! maps and the association in an ordered set of ID pairs, so iteration order
//! matches the Postgres backend (ascending IDs).

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::db::repository::{
    DirectoryRepository, DirectorySession, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::{
    Activity, ActivityId, NewActivity, NewStudent, Participation, Student, StudentId,
};

/// In-memory local repository.
///
/// A unit of work holds the write lock for its whole duration and operates on
/// a staged copy of the data; the copy replaces the live data only when the
/// work succeeds.
///
/// # Example
/// ```
/// use school_activities::db::repositories::LocalRepository;
/// use school_activities::models::NewActivity;
///
/// let repo = LocalRepository::new();
/// repo.insert_activity_impl(NewActivity::new("Chess Club", 12)).unwrap();
/// assert_eq!(repo.activity_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Clone)]
struct LocalData {
    activities: BTreeMap<ActivityId, Activity>,
    students: BTreeMap<StudentId, Student>,
    participations: BTreeSet<Participation>,

    // ID counters
    next_activity_id: i32,
    next_student_id: i32,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            activities: BTreeMap::new(),
            students: BTreeMap::new(),
            participations: BTreeSet::new(),
            next_activity_id: 1,
            next_student_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Insert an activity outside of a unit of work.
    ///
    /// Helper for setting up test data.
    pub fn insert_activity_impl(&self, activity: NewActivity) -> RepositoryResult<ActivityId> {
        let mut data = self.data.write();
        LocalSession { data: &mut *data }
            .insert_activity(&activity)
            .map(|a| a.id)
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of activities stored.
    pub fn activity_count(&self) -> usize {
        self.data.read().activities.len()
    }

    /// Get the number of students stored.
    pub fn student_count(&self) -> usize {
        self.data.read().students.len()
    }

    /// Get the number of association edges stored.
    pub fn participation_count(&self) -> usize {
        self.data.read().participations.len()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<RepositoryError> + Send + 'static,
        F: FnOnce(&mut dyn DirectorySession) -> Result<T, E> + Send + 'static,
    {
        let mut live = self.data.write();
        if !live.is_healthy {
            return Err(E::from(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new("transaction"),
            )));
        }

        // Every unit of work clones the full data set, reads included.
        let mut staged = live.clone();
        let result = work(&mut LocalSession { data: &mut staged });
        if result.is_ok() {
            *live = staged;
        }
        result
    }
}

/// Session over a staged copy of [`LocalData`].
struct LocalSession<'a> {
    data: &'a mut LocalData,
}

impl DirectorySession for LocalSession<'_> {
    fn list_activities(&mut self) -> RepositoryResult<Vec<Activity>> {
        Ok(self.data.activities.values().cloned().collect())
    }

    fn find_activity(&mut self, name: &str) -> RepositoryResult<Option<Activity>> {
        Ok(self
            .data
            .activities
            .values()
            .find(|a| a.name == name)
            .cloned())
    }

    fn insert_activity(&mut self, activity: &NewActivity) -> RepositoryResult<Activity> {
        if self.data.activities.values().any(|a| a.name == activity.name) {
            return Err(RepositoryError::conflict_with_context(
                format!("Activity '{}' already exists", activity.name),
                ErrorContext::new("insert_activity")
                    .with_entity("activity")
                    .with_entity_id(&activity.name),
            ));
        }

        let id = ActivityId::new(self.data.next_activity_id);
        self.data.next_activity_id += 1;

        let row = Activity {
            id,
            name: activity.name.clone(),
            description: activity.description.clone(),
            schedule: activity.schedule.clone(),
            max_participants: activity.max_participants,
        };
        self.data.activities.insert(id, row.clone());
        Ok(row)
    }

    fn participants(&mut self, activity_id: ActivityId) -> RepositoryResult<Vec<Student>> {
        let data = &*self.data;
        data.participations
            .iter()
            .filter(|edge| edge.activity_id == activity_id)
            .map(|edge| {
                data.students.get(&edge.student_id).cloned().ok_or_else(|| {
                    RepositoryError::internal_with_context(
                        "Participation references a missing student",
                        ErrorContext::new("participants")
                            .with_entity("student")
                            .with_entity_id(edge.student_id),
                    )
                })
            })
            .collect()
    }

    fn find_student(&mut self, email: &str) -> RepositoryResult<Option<Student>> {
        Ok(self
            .data
            .students
            .values()
            .find(|s| s.email == email)
            .cloned())
    }

    fn insert_or_get_student(&mut self, student: &NewStudent) -> RepositoryResult<Student> {
        if let Some(existing) = self.find_student(&student.email)? {
            return Ok(existing);
        }

        let id = StudentId::new(self.data.next_student_id);
        self.data.next_student_id += 1;

        let row = Student {
            id,
            email: student.email.clone(),
            name: student.name.clone(),
            grade_level: student.grade_level.clone(),
        };
        self.data.students.insert(id, row.clone());
        Ok(row)
    }

    fn is_participant(&mut self, edge: Participation) -> RepositoryResult<bool> {
        Ok(self.data.participations.contains(&edge))
    }

    fn add_participant(&mut self, edge: Participation) -> RepositoryResult<()> {
        let context = || {
            ErrorContext::new("add_participant")
                .with_entity("participation")
                .with_entity_id(format!("{}:{}", edge.activity_id, edge.student_id))
        };

        if !self.data.activities.contains_key(&edge.activity_id) {
            return Err(RepositoryError::validation_with_context(
                "Participation references a missing activity",
                context(),
            ));
        }
        if !self.data.students.contains_key(&edge.student_id) {
            return Err(RepositoryError::validation_with_context(
                "Participation references a missing student",
                context(),
            ));
        }
        if !self.data.participations.insert(edge) {
            return Err(RepositoryError::conflict_with_context(
                "Participation already exists",
                context(),
            ));
        }
        Ok(())
    }

    fn remove_participant(&mut self, edge: Participation) -> RepositoryResult<bool> {
        Ok(self.data.participations.remove(&edge))
    }
}
