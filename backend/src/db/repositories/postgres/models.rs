use diesel::prelude::*;

use super::schema::{activities, activity_participants, students};
use crate::models::{Activity, ActivityId, Participation, Student, StudentId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: i32,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Activity {
            id: ActivityId::new(row.id),
            name: row.name,
            description: row.description,
            schedule: row.schedule,
            max_participants: row.max_participants,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
pub struct NewActivityRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub schedule: &'a str,
    pub max_participants: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub grade_level: String,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: StudentId::new(row.id),
            email: row.email,
            name: row.name,
            grade_level: row.grade_level,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub struct NewStudentRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub grade_level: &'a str,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = activity_participants)]
pub struct ParticipationRow {
    pub activity_id: i32,
    pub student_id: i32,
}

impl From<Participation> for ParticipationRow {
    fn from(edge: Participation) -> Self {
        ParticipationRow {
            activity_id: edge.activity_id.value(),
            student_id: edge.student_id.value(),
        }
    }
}
