//! Activity seeding.
//!
//! Activities are not created through the HTTP API. They are loaded at
//! startup from a TOML file of `[[activities]]` tables:
//!
//! ```toml
//! [[activities]]
//! name = "Chess Club"
//! description = "Learn strategies and compete in chess tournaments"
//! schedule = "Fridays, 3:30 PM - 5:00 PM"
//! max_participants = 12
//! ```

use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::error::{DirectoryError, DirectoryResult};
use crate::db::repository::{DirectoryRepository, RepositoryError};
use crate::models::NewActivity;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    activities: Vec<NewActivity>,
}

/// Parse activity seeds from TOML text.
pub fn parse_seeds(content: &str) -> DirectoryResult<Vec<NewActivity>> {
    let file: SeedFile = toml::from_str(content).map_err(|e| {
        RepositoryError::configuration(format!("Failed to parse seed file: {}", e))
    })?;
    Ok(file.activities)
}

/// Read and parse a seed file.
pub fn load_seed_file<P: AsRef<Path>>(path: P) -> DirectoryResult<Vec<NewActivity>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        RepositoryError::configuration(format!(
            "Failed to read seed file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_seeds(&content)
}

fn validate(seed: &NewActivity) -> DirectoryResult<()> {
    if seed.name.trim().is_empty() {
        return Err(DirectoryError::InvalidInput(
            "Activity name must not be empty".to_string(),
        ));
    }
    if seed.max_participants <= 0 {
        return Err(DirectoryError::InvalidInput(format!(
            "Activity '{}' must have a positive max_participants",
            seed.name
        )));
    }
    Ok(())
}

/// Insert the seeds whose names are not already present.
///
/// All seeds are validated before anything is written, and the inserts run in
/// one unit of work. Duplicate names within `seeds` are inserted once.
/// Returns the number of activities inserted.
pub async fn seed_activities<R: DirectoryRepository>(
    repo: &R,
    seeds: Vec<NewActivity>,
) -> DirectoryResult<usize> {
    seeds.iter().try_for_each(validate)?;

    let inserted = repo
        .transaction(move |session| -> DirectoryResult<usize> {
            let mut existing: BTreeSet<String> = session
                .list_activities()?
                .into_iter()
                .map(|a| a.name)
                .collect();

            let mut inserted = 0;
            for seed in &seeds {
                if !existing.insert(seed.name.clone()) {
                    debug!("Activity {} already present, skipping", seed.name);
                    continue;
                }
                session.insert_activity(seed)?;
                inserted += 1;
            }
            Ok(inserted)
        })
        .await?;

    info!("Seeded {} activities", inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seeds_defaults_optional_fields() {
        let seeds = parse_seeds(
            r#"
[[activities]]
name = "Chess Club"
max_participants = 12
"#,
        )
        .unwrap();

        assert_eq!(seeds, vec![NewActivity::new("Chess Club", 12)]);
    }

    #[test]
    fn test_parse_seeds_empty_file() {
        assert!(parse_seeds("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_seeds_rejects_missing_capacity() {
        let err = parse_seeds("[[activities]]\nname = \"Chess Club\"\n").unwrap_err();
        assert!(matches!(err, DirectoryError::Repository(_)));
    }

    #[test]
    fn test_validate_rejects_bad_seeds() {
        assert!(validate(&NewActivity::new("", 10)).is_err());
        assert!(validate(&NewActivity::new("Chess Club", 0)).is_err());
        assert!(validate(&NewActivity::new("Chess Club", 1)).is_ok());
    }
}
