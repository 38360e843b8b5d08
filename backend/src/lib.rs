//! # School Activities
//!
//! Sign-up directory for school extracurricular activities.
//!
//! Students browse activities, read occupancy statistics, sign up and
//! unregister. Activities and students are linked through an explicit
//! participation table whose `(activity, student)` pairs are unique.
//!
//! ## Architecture
//!
//! - [`models`]: Activity, Student and Participation entities
//! - [`db`]: Repository traits, in-memory and Postgres backends, configuration
//! - [`services`]: Directory operations, each in a single unit of work
//! - [`api`]: Data Transfer Objects returned by the services
//! - [`http`]: Axum-based HTTP server and request handlers
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
