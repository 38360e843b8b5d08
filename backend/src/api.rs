//! Public API surface for the activity directory.
//!
//! This file consolidates the DTO types returned by the service layer and
//! serialized by the HTTP API. All types derive Serialize/Deserialize for JSON
//! serialization.
//!
//! Result maps are keyed by activity name and use `BTreeMap`, so JSON output
//! lists activities alphabetically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One activity in the directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub description: String,
    pub schedule: String,
    pub max_participants: i32,
    /// Participant emails, ordered by student registration.
    pub participants: Vec<String>,
}

/// Directory listing keyed by activity name.
pub type ActivityListing = BTreeMap<String, ActivitySummary>;

/// Occupancy figures for one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStatistics {
    pub max_participants: i32,
    pub current_participants: usize,
    /// `max_participants - current_participants`; negative when oversubscribed.
    pub vacancies: i64,
}

/// Statistics keyed by activity name.
pub type StatisticsReport = BTreeMap<String, ActivityStatistics>;

/// Participation history of a single activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityHistory {
    pub activity: String,
    pub participants: Vec<String>,
    pub max_participants: i32,
    pub vacancies: i64,
    pub description: String,
    pub schedule: String,
}

/// Confirmation returned by signup and unregister.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Signup request for an activity.
///
/// `student_name` and `grade_level` are only read when the email is unknown
/// and a new student has to be registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub activity: String,
    pub email: String,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub grade_level: Option<String>,
}

impl SignupRequest {
    pub fn new(activity: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            email: email.into(),
            student_name: None,
            grade_level: None,
        }
    }

    /// Attach the registration fields used for a first-time signup.
    pub fn with_registration(
        mut self,
        student_name: impl Into<String>,
        grade_level: impl Into<String>,
    ) -> Self {
        self.student_name = Some(student_name.into());
        self.grade_level = Some(grade_level.into());
        self
    }
}
