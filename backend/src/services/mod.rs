//! Service layer for business logic and orchestration.
//!
//! This module sits between the repository traits and the HTTP handlers.
//! Services open units of work, enforce the signup rules and shape the
//! results into the DTOs of [`crate::api`].

pub mod directory;
pub mod error;
pub mod seed;

pub use directory::{
    get_activity_history, get_statistics, health_check, list_activities, sign_up, unregister,
};
pub use error::{DirectoryError, DirectoryResult};
pub use seed::{load_seed_file, parse_seeds, seed_activities};
