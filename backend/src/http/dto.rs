//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies of the directory endpoints are the service DTOs from
//! [`crate::api`], re-exported here. Request inputs arrive as query
//! parameters.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    ActivityHistory, ActivityListing, ActivityStatistics, ActivitySummary, MessageResponse,
    SignupRequest, StatisticsReport,
};

/// Query parameters of `POST /activities/{name}/signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupParams {
    pub email: String,
    /// Student display name, required only for a first-time signup
    #[serde(default)]
    pub name: Option<String>,
    /// Grade level, required only for a first-time signup
    #[serde(default)]
    pub grade_level: Option<String>,
}

impl SignupParams {
    /// Combine with the activity name from the path.
    pub fn into_request(self, activity: String) -> SignupRequest {
        SignupRequest {
            activity,
            email: self.email,
            student_name: self.name,
            grade_level: self.grade_level,
        }
    }
}

/// Query parameters of `DELETE /activities/{name}/unregister`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnregisterParams {
    pub email: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
