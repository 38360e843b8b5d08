//! Domain entities of the activity directory.
//!
//! Two entities, [`Activity`] and [`Student`], are linked by a plain
//! many-to-many association modelled as an owned set of [`Participation`]
//! pairs. Activities are looked up by `name` and students by `email`; the
//! numeric IDs never leave the persistence layer.

#[macro_use]
pub mod macros;

pub mod activity;
pub mod participation;
pub mod student;

pub use activity::{Activity, ActivityId, NewActivity};
pub use participation::Participation;
pub use student::{NewStudent, Student, StudentId};
