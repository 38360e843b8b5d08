//! Build script for school-activities
//!
//! Diesel embeds the SQL migrations at compile time, so edits under
//! `migrations/` must trigger a rebuild.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(feature = "postgres-repo")]
    println!("cargo:rerun-if-changed=migrations");
}
