//! Activity directory operations.
//!
//! Every operation runs inside exactly one unit of work opened through
//! [`DirectoryRepository::transaction`]. A rejected signup or unregister
//! returns `Err` from the closure, so nothing it staged reaches the store.
//!
//! # Usage
//!
//! ```
//! use school_activities::api::SignupRequest;
//! use school_activities::db::repositories::LocalRepository;
//! use school_activities::models::NewActivity;
//! use school_activities::services::directory;
//!
//! let repo = LocalRepository::new();
//! repo.insert_activity_impl(NewActivity::new("Chess Club", 10)).unwrap();
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let request = SignupRequest::new("Chess Club", "a@x.com").with_registration("Ann", "10");
//!     let reply = directory::sign_up(&repo, request).await.unwrap();
//!     assert_eq!(reply.message, "Signed up a@x.com for Chess Club");
//! });
//! ```

use log::{debug, error, info, warn};

use super::error::{DirectoryError, DirectoryResult};
use crate::api::{
    ActivityHistory, ActivityListing, ActivityStatistics, ActivitySummary, MessageResponse,
    SignupRequest, StatisticsReport,
};
use crate::db::repository::{DirectoryRepository, DirectorySession, RepositoryResult};
use crate::models::{Activity, NewStudent, Participation, Student};

fn emails(students: &[Student]) -> Vec<String> {
    students.iter().map(|s| s.email.clone()).collect()
}

fn require_activity(session: &mut dyn DirectorySession, name: &str) -> DirectoryResult<Activity> {
    session
        .find_activity(name)?
        .ok_or_else(DirectoryError::activity_not_found)
}

/// Both registration fields must be present and non-empty.
fn registration_fields(
    student_name: Option<String>,
    grade_level: Option<String>,
) -> DirectoryResult<(String, String)> {
    match (student_name, grade_level) {
        (Some(name), Some(grade)) if !name.is_empty() && !grade.is_empty() => Ok((name, grade)),
        _ => Err(DirectoryError::registration_required()),
    }
}

fn log_outcome<T>(operation: &str, activity: &str, email: &str, result: &DirectoryResult<T>) {
    match result {
        Ok(_) => info!("{}: {} / {}", operation, activity, email),
        Err(e) if e.is_client_error() => {
            warn!("{} rejected for {} / {}: {}", operation, activity, email, e)
        }
        Err(e) => error!("{} failed for {} / {}: {}", operation, activity, email, e),
    }
}

/// Check if the storage backend is reachable.
pub async fn health_check<R: DirectoryRepository>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// List every activity with its participant emails.
///
/// Returns an empty map when no activities exist.
pub async fn list_activities<R: DirectoryRepository>(repo: &R) -> DirectoryResult<ActivityListing> {
    let listing = repo
        .transaction(|session| -> DirectoryResult<ActivityListing> {
            let mut listing = ActivityListing::new();
            for activity in session.list_activities()? {
                let participants = session.participants(activity.id)?;
                listing.insert(
                    activity.name,
                    ActivitySummary {
                        description: activity.description,
                        schedule: activity.schedule,
                        max_participants: activity.max_participants,
                        participants: emails(&participants),
                    },
                );
            }
            Ok(listing)
        })
        .await?;

    debug!("Listed {} activities", listing.len());
    Ok(listing)
}

/// Occupancy figures for every activity.
///
/// `vacancies` is `max_participants - current_participants` and goes negative
/// when an activity is oversubscribed.
pub async fn get_statistics<R: DirectoryRepository>(repo: &R) -> DirectoryResult<StatisticsReport> {
    let report = repo
        .transaction(|session| -> DirectoryResult<StatisticsReport> {
            let mut report = StatisticsReport::new();
            for activity in session.list_activities()? {
                let current = session.participants(activity.id)?.len();
                report.insert(
                    activity.name.clone(),
                    ActivityStatistics {
                        max_participants: activity.max_participants,
                        current_participants: current,
                        vacancies: activity.vacancies(current),
                    },
                );
            }
            Ok(report)
        })
        .await?;

    debug!("Computed statistics for {} activities", report.len());
    Ok(report)
}

/// Participation history of the activity with exactly this name.
///
/// # Errors
/// * `DirectoryError::NotFound` - If no activity has that name
pub async fn get_activity_history<R: DirectoryRepository>(
    repo: &R,
    name: &str,
) -> DirectoryResult<ActivityHistory> {
    let name = name.to_string();
    repo.transaction(move |session| -> DirectoryResult<ActivityHistory> {
        let activity = require_activity(session, &name)?;
        let participants = session.participants(activity.id)?;
        debug!(
            "History for {}: {} participants",
            activity.name,
            participants.len()
        );

        Ok(ActivityHistory {
            vacancies: activity.vacancies(participants.len()),
            participants: emails(&participants),
            activity: activity.name,
            max_participants: activity.max_participants,
            description: activity.description,
            schedule: activity.schedule,
        })
    })
    .await
}

/// Sign a student up for an activity.
///
/// An unknown email registers a new student, which requires both
/// `student_name` and `grade_level`. A known email reuses the stored student
/// and ignores the registration fields. Capacity is not checked.
///
/// # Errors
/// * `DirectoryError::NotFound` - If the activity does not exist
/// * `DirectoryError::InvalidInput` - If a new student lacks name or grade level
/// * `DirectoryError::AlreadyRegistered` - If the student is already a participant
pub async fn sign_up<R: DirectoryRepository>(
    repo: &R,
    request: SignupRequest,
) -> DirectoryResult<MessageResponse> {
    let activity_name = request.activity.clone();
    let email = request.email.clone();

    let result = repo
        .transaction(move |session| -> DirectoryResult<MessageResponse> {
            let SignupRequest {
                activity,
                email,
                student_name,
                grade_level,
            } = request;

            let activity = require_activity(session, &activity)?;
            let student = match session.find_student(&email)? {
                Some(student) => student,
                None => {
                    let (name, grade_level) = registration_fields(student_name, grade_level)?;
                    let student = session.insert_or_get_student(&NewStudent {
                        email: email.clone(),
                        name,
                        grade_level,
                    })?;
                    debug!("Registered student {} ({})", student.email, student.id);
                    student
                }
            };

            let edge = Participation::new(activity.id, student.id);
            if session.is_participant(edge)? {
                return Err(DirectoryError::already_registered());
            }
            session.add_participant(edge).map_err(|e| {
                if e.is_conflict() {
                    DirectoryError::already_registered()
                } else {
                    DirectoryError::from(e)
                }
            })?;

            Ok(MessageResponse::new(format!(
                "Signed up {} for {}",
                email, activity.name
            )))
        })
        .await;

    log_outcome("signup", &activity_name, &email, &result);
    result
}

/// Remove a student from an activity.
///
/// Only the association is deleted; the student and the activity remain.
///
/// # Errors
/// * `DirectoryError::NotFound` - If the activity does not exist
/// * `DirectoryError::NotRegistered` - If the student is unknown or not a participant
pub async fn unregister<R: DirectoryRepository>(
    repo: &R,
    activity: &str,
    email: &str,
) -> DirectoryResult<MessageResponse> {
    let activity_name = activity.to_string();
    let email = email.to_string();
    let (activity_arg, email_arg) = (activity_name.clone(), email.clone());

    let result = repo
        .transaction(move |session| -> DirectoryResult<MessageResponse> {
            let activity = require_activity(session, &activity_arg)?;
            let student = session
                .find_student(&email_arg)?
                .ok_or_else(DirectoryError::not_registered)?;

            let edge = Participation::new(activity.id, student.id);
            if !session.remove_participant(edge)? {
                return Err(DirectoryError::not_registered());
            }

            Ok(MessageResponse::new(format!(
                "Unregistered {} from {}",
                email_arg, activity.name
            )))
        })
        .await;

    log_outcome("unregister", &activity_name, &email, &result);
    result
}
