//! Activity entity.

use serde::{Deserialize, Serialize};

define_id_type!(
    /// Activity identifier (database primary key).
    i32,
    ActivityId
);

/// A named extracurricular offering with a schedule and a capacity.
///
/// `max_participants` is informational: signups are accepted past it and the
/// statistics report the overflow as negative vacancies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: i32,
}

impl Activity {
    /// Capacity left given the current participant count. May be negative.
    pub fn vacancies(&self, current_participants: usize) -> i64 {
        i64::from(self.max_participants) - current_participants as i64
    }
}

/// Insert shape for an activity; the ID is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schedule: String,
    pub max_participants: i32,
}

impl NewActivity {
    pub fn new(name: impl Into<String>, max_participants: i32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schedule: String::new(),
            max_participants,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = schedule.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(max: i32) -> Activity {
        Activity {
            id: ActivityId::new(1),
            name: "Chess Club".to_string(),
            description: String::new(),
            schedule: String::new(),
            max_participants: max,
        }
    }

    #[test]
    fn test_vacancies_not_clamped() {
        assert_eq!(activity(10).vacancies(0), 10);
        assert_eq!(activity(10).vacancies(10), 0);
        assert_eq!(activity(2).vacancies(5), -3);
    }

    #[test]
    fn test_activity_id_display_and_conversion() {
        let id = ActivityId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(ActivityId::from(42), id);
    }

    #[test]
    fn test_new_activity_builder() {
        let seed = NewActivity::new("Chess Club", 12)
            .with_description("Learn strategies")
            .with_schedule("Fridays, 3:30 PM - 5:00 PM");
        assert_eq!(seed.name, "Chess Club");
        assert_eq!(seed.max_participants, 12);
        assert_eq!(seed.schedule, "Fridays, 3:30 PM - 5:00 PM");
    }
}
