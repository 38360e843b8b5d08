//! Integration tests for the activity directory service over the local repository.

mod support;

use school_activities::api::{ActivityStatistics, SignupRequest};
use school_activities::db::repositories::LocalRepository;
use school_activities::services::{self, DirectoryError};

fn register(activity: &str, email: &str) -> SignupRequest {
    SignupRequest::new(activity, email).with_registration("Ann", "10")
}

#[tokio::test]
async fn test_list_activities_empty_store() {
    let repo = LocalRepository::new();
    let listing = services::list_activities(&repo).await.unwrap();
    assert!(listing.is_empty());

    let stats = services::get_statistics(&repo).await.unwrap();
    assert!(stats.is_empty());
}

#[tokio::test]
async fn test_list_activities_includes_participant_emails() {
    let repo = support::repo_with_activities(&[("Chess Club", 12), ("Gym Class", 30)]);
    services::sign_up(&repo, register("Chess Club", "a@x.com"))
        .await
        .unwrap();
    services::sign_up(&repo, register("Chess Club", "b@x.com"))
        .await
        .unwrap();

    let listing = services::list_activities(&repo).await.unwrap();
    assert_eq!(listing.len(), 2);

    let chess = &listing["Chess Club"];
    assert_eq!(chess.max_participants, 12);
    assert_eq!(chess.description, "Chess Club description");
    assert_eq!(chess.schedule, "Fridays, 3:30 PM - 5:00 PM");
    assert_eq!(chess.participants, vec!["a@x.com", "b@x.com"]);
    assert!(listing["Gym Class"].participants.is_empty());
}

#[tokio::test]
async fn test_unknown_activity_is_not_found_everywhere() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);

    let history = services::get_activity_history(&repo, "Drama Club").await;
    assert!(matches!(history, Err(DirectoryError::NotFound(_))));

    let signup = services::sign_up(&repo, register("Drama Club", "a@x.com")).await;
    assert!(matches!(signup, Err(DirectoryError::NotFound(_))));

    let unregister = services::unregister(&repo, "Drama Club", "a@x.com").await;
    assert!(matches!(unregister, Err(DirectoryError::NotFound(_))));
}

#[tokio::test]
async fn test_activity_lookup_is_exact() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);

    let result = services::get_activity_history(&repo, "chess club").await;
    assert!(matches!(result, Err(DirectoryError::NotFound(_))));
}

#[tokio::test]
async fn test_sign_up_then_unregister_round_trip() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);
    let before = services::get_activity_history(&repo, "Chess Club")
        .await
        .unwrap();

    services::sign_up(&repo, register("Chess Club", "a@x.com"))
        .await
        .unwrap();
    services::unregister(&repo, "Chess Club", "a@x.com")
        .await
        .unwrap();

    let after = services::get_activity_history(&repo, "Chess Club")
        .await
        .unwrap();
    assert_eq!(before, after);
    assert_eq!(repo.participation_count(), 0);
}

#[tokio::test]
async fn test_duplicate_sign_up_is_already_registered() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);

    services::sign_up(&repo, register("Chess Club", "a@x.com"))
        .await
        .unwrap();
    let second = services::sign_up(&repo, register("Chess Club", "a@x.com")).await;

    assert!(matches!(second, Err(DirectoryError::AlreadyRegistered(_))));
    assert_eq!(repo.participation_count(), 1);
    assert_eq!(repo.student_count(), 1);
}

#[tokio::test]
async fn test_unregister_without_sign_up_is_not_registered() {
    let repo = support::repo_with_activities(&[("Chess Club", 10), ("Gym Class", 30)]);

    // Unknown student
    let unknown = services::unregister(&repo, "Chess Club", "nobody@x.com").await;
    assert!(matches!(unknown, Err(DirectoryError::NotRegistered(_))));

    // Known student, different activity
    services::sign_up(&repo, register("Gym Class", "a@x.com"))
        .await
        .unwrap();
    let other = services::unregister(&repo, "Chess Club", "a@x.com").await;
    assert!(matches!(other, Err(DirectoryError::NotRegistered(_))));
    assert_eq!(repo.participation_count(), 1);
}

#[tokio::test]
async fn test_unknown_student_requires_registration_fields() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);

    let bare = services::sign_up(&repo, SignupRequest::new("Chess Club", "a@x.com")).await;
    match bare {
        Err(DirectoryError::InvalidInput(msg)) => assert_eq!(
            msg,
            "Student not found. Provide name and grade_level to register."
        ),
        other => panic!("expected InvalidInput, got {:?}", other),
    }

    let mut name_only = SignupRequest::new("Chess Club", "a@x.com");
    name_only.student_name = Some("Ann".to_string());
    let result = services::sign_up(&repo, name_only).await;
    assert!(matches!(result, Err(DirectoryError::InvalidInput(_))));

    let empty = SignupRequest::new("Chess Club", "a@x.com").with_registration("", "10");
    let result = services::sign_up(&repo, empty).await;
    assert!(matches!(result, Err(DirectoryError::InvalidInput(_))));

    assert_eq!(repo.student_count(), 0);
    assert_eq!(repo.participation_count(), 0);
}

#[tokio::test]
async fn test_registration_creates_one_student_and_one_association() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);

    services::sign_up(&repo, register("Chess Club", "a@x.com"))
        .await
        .unwrap();

    assert_eq!(repo.student_count(), 1);
    assert_eq!(repo.participation_count(), 1);
}

#[tokio::test]
async fn test_existing_student_reused_across_activities() {
    let repo = support::repo_with_activities(&[("Chess Club", 10), ("Gym Class", 30)]);

    services::sign_up(&repo, register("Chess Club", "a@x.com"))
        .await
        .unwrap();
    // No registration fields needed for a known email; supplied ones are ignored.
    services::sign_up(&repo, SignupRequest::new("Gym Class", "a@x.com"))
        .await
        .unwrap();
    services::sign_up(
        &repo,
        SignupRequest::new("Gym Class", "a@x.com").with_registration("Other", "12"),
    )
    .await
    .unwrap_err();

    assert_eq!(repo.student_count(), 1);
    assert_eq!(repo.participation_count(), 2);
}

#[tokio::test]
async fn test_repeat_sign_up_keeps_stored_student_fields() {
    let repo = support::repo_with_activities(&[("Chess Club", 10), ("Gym Class", 30)]);

    services::sign_up(&repo, register("Chess Club", "a@x.com"))
        .await
        .unwrap();
    services::sign_up(
        &repo,
        SignupRequest::new("Gym Class", "a@x.com").with_registration("Bob", "12"),
    )
    .await
    .unwrap();

    let student = support::stored_student(&repo, "a@x.com").await.unwrap();
    assert_eq!(student.name, "Ann");
    assert_eq!(student.grade_level, "10");
    assert_eq!(repo.student_count(), 1);
}

#[tokio::test]
async fn test_failed_sign_up_leaves_no_student_behind() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);

    let result = services::sign_up(&repo, register("Drama Club", "new@x.com")).await;
    assert!(result.is_err());
    assert_eq!(repo.student_count(), 0);
}

#[tokio::test]
async fn test_vacancies_go_negative_when_oversubscribed() {
    let repo = support::repo_with_activities(&[("Chess Club", 2)]);

    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        services::sign_up(&repo, register("Chess Club", email))
            .await
            .unwrap();
    }

    let stats = services::get_statistics(&repo).await.unwrap();
    assert_eq!(
        stats["Chess Club"],
        ActivityStatistics {
            max_participants: 2,
            current_participants: 3,
            vacancies: -1,
        }
    );

    let history = services::get_activity_history(&repo, "Chess Club")
        .await
        .unwrap();
    assert_eq!(history.vacancies, -1);
    assert_eq!(history.participants.len(), 3);
}

#[tokio::test]
async fn test_chess_club_scenario() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);

    let reply = services::sign_up(&repo, register("Chess Club", "a@x.com"))
        .await
        .unwrap();
    assert!(reply.message.contains("a@x.com"));
    assert!(reply.message.contains("Chess Club"));

    let stats = services::get_statistics(&repo).await.unwrap();
    assert_eq!(
        stats["Chess Club"],
        ActivityStatistics {
            max_participants: 10,
            current_participants: 1,
            vacancies: 9,
        }
    );

    let again = services::sign_up(&repo, SignupRequest::new("Chess Club", "a@x.com")).await;
    assert!(matches!(again, Err(DirectoryError::AlreadyRegistered(_))));

    let reply = services::unregister(&repo, "Chess Club", "a@x.com")
        .await
        .unwrap();
    assert_eq!(reply.message, "Unregistered a@x.com from Chess Club");

    let history = services::get_activity_history(&repo, "Chess Club")
        .await
        .unwrap();
    assert!(history.participants.is_empty());
    assert_eq!(history.activity, "Chess Club");
    assert_eq!(history.vacancies, 10);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_repository_error() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);
    repo.set_healthy(false);

    let result = services::list_activities(&repo).await;
    match result {
        Err(err @ DirectoryError::Repository(_)) => assert!(!err.is_client_error()),
        other => panic!("expected repository error, got {:?}", other),
    }

    let result = services::sign_up(&repo, register("Chess Club", "a@x.com")).await;
    assert!(matches!(result, Err(DirectoryError::Repository(_))));

    repo.set_healthy(true);
    assert_eq!(repo.student_count(), 0);
}

#[tokio::test]
async fn test_concurrent_sign_ups_register_once() {
    let repo = support::repo_with_activities(&[("Chess Club", 10)]);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move {
                services::sign_up(&repo, register("Chess Club", "a@x.com")).await
            })
        })
        .collect();

    let mut successes = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => successes += 1,
            Err(DirectoryError::AlreadyRegistered(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(repo.student_count(), 1);
    assert_eq!(repo.participation_count(), 1);
}
