//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use school_activities::db::repositories::LocalRepository;
use school_activities::db::DirectoryRepository;
use school_activities::models::{NewActivity, Student};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Access to the process environment is serialized across tests and every
/// variable is restored on exit, including on panic.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::apply(changes);
    f()
}

struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let saved = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            set_or_remove(k, *v);
        }

        Self { saved }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.saved.drain(..) {
            set_or_remove(&k, v.as_deref());
        }
    }
}

fn set_or_remove(key: &str, value: Option<&str>) {
    match value {
        Some(val) => std::env::set_var(key, val),
        None => std::env::remove_var(key),
    }
}

/// Local repository holding the given activities.
pub fn repo_with_activities(activities: &[(&str, i32)]) -> LocalRepository {
    let repo = LocalRepository::new();
    for (name, max) in activities {
        repo.insert_activity_impl(
            NewActivity::new(*name, *max)
                .with_description(format!("{} description", name))
                .with_schedule("Fridays, 3:30 PM - 5:00 PM"),
        )
        .expect("seed activity");
    }
    repo
}

/// The stored student row for `email`, read in its own unit of work.
pub async fn stored_student(repo: &LocalRepository, email: &str) -> Option<Student> {
    let email = email.to_string();
    repo.transaction(move |session| session.find_student(&email))
        .await
        .expect("read student")
}
