//! The activity/student association edge.

use serde::{Deserialize, Serialize};

use super::{ActivityId, StudentId};

/// Foreign-key pair recording that a student is signed up for an activity.
///
/// The pair carries no attributes of its own and is unique per store.
/// Ordering is by activity, then student, so a sorted set of edges lists each
/// activity's participants in student-id order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Participation {
    pub activity_id: ActivityId,
    pub student_id: StudentId,
}

impl Participation {
    pub fn new(activity_id: ActivityId, student_id: StudentId) -> Self {
        Self {
            activity_id,
            student_id,
        }
    }
}
