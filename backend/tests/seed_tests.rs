//! Tests for activity seeding from TOML files.

mod support;

use std::io::Write;

use school_activities::db::repositories::LocalRepository;
use school_activities::models::NewActivity;
use school_activities::services::{self, DirectoryError};

const SEEDS: &str = r#"
[[activities]]
name = "Chess Club"
description = "Learn strategies and compete in chess tournaments"
schedule = "Fridays, 3:30 PM - 5:00 PM"
max_participants = 12

[[activities]]
name = "Programming Class"
description = "Learn programming fundamentals and build software projects"
schedule = "Tuesdays and Thursdays, 3:30 PM - 4:30 PM"
max_participants = 20
"#;

#[tokio::test]
async fn test_load_seed_file_and_seed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SEEDS.as_bytes()).unwrap();

    let seeds = services::load_seed_file(file.path()).unwrap();
    assert_eq!(seeds.len(), 2);

    let repo = LocalRepository::new();
    let inserted = services::seed_activities(&repo, seeds).await.unwrap();
    assert_eq!(inserted, 2);

    let listing = services::list_activities(&repo).await.unwrap();
    let chess = &listing["Chess Club"];
    assert_eq!(chess.max_participants, 12);
    assert_eq!(chess.schedule, "Fridays, 3:30 PM - 5:00 PM");
    assert!(chess.participants.is_empty());
}

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let repo = LocalRepository::new();
    let seeds = services::parse_seeds(SEEDS).unwrap();

    assert_eq!(
        services::seed_activities(&repo, seeds.clone()).await.unwrap(),
        2
    );
    assert_eq!(services::seed_activities(&repo, seeds).await.unwrap(), 0);
    assert_eq!(repo.activity_count(), 2);
}

#[tokio::test]
async fn test_seeding_keeps_existing_participants() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);
    services::sign_up(
        &repo,
        school_activities::api::SignupRequest::new("Chess Club", "a@x.com")
            .with_registration("Ann", "10"),
    )
    .await
    .unwrap();

    let inserted = services::seed_activities(&repo, services::parse_seeds(SEEDS).unwrap())
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    let history = services::get_activity_history(&repo, "Chess Club")
        .await
        .unwrap();
    assert_eq!(history.participants, vec!["a@x.com"]);
    assert_eq!(history.max_participants, 10);
}

#[tokio::test]
async fn test_duplicate_names_in_one_batch_inserted_once() {
    let repo = LocalRepository::new();
    let seeds = vec![
        NewActivity::new("Chess Club", 10),
        NewActivity::new("Chess Club", 20),
    ];

    assert_eq!(services::seed_activities(&repo, seeds).await.unwrap(), 1);
    assert_eq!(repo.activity_count(), 1);
}

#[tokio::test]
async fn test_invalid_seed_rejects_whole_batch() {
    let repo = LocalRepository::new();
    let seeds = vec![
        NewActivity::new("Chess Club", 10),
        NewActivity::new("Gym Class", 0),
    ];

    let result = services::seed_activities(&repo, seeds).await;
    assert!(matches!(result, Err(DirectoryError::InvalidInput(_))));
    assert_eq!(repo.activity_count(), 0);

    let result = services::seed_activities(&repo, vec![NewActivity::new("  ", 10)]).await;
    assert!(matches!(result, Err(DirectoryError::InvalidInput(_))));
}

#[test]
fn test_load_missing_seed_file() {
    let result = services::load_seed_file("/nonexistent/activities.toml");
    assert!(matches!(result, Err(DirectoryError::Repository(_))));
}

#[test]
fn test_sample_seed_file_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/activities.toml");
    let seeds = services::load_seed_file(path).unwrap();
    assert!(seeds.iter().any(|s| s.name == "Chess Club"));
    assert!(seeds.iter().all(|s| s.max_participants > 0));
}
