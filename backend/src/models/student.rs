//! Student entity.

use serde::{Deserialize, Serialize};

define_id_type!(
    /// Student identifier (database primary key).
    i32,
    StudentId
);

/// A registrant, identified externally by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub email: String,
    pub name: String,
    pub grade_level: String,
}

/// Insert shape for a student created on first signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub email: String,
    pub name: String,
    pub grade_level: String,
}
