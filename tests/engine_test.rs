//! End-to-end engine tests against real repositories in temp directories.
//!
//! Every scenario drives the actual `git` binary through the same runner
//! the engine uses in production.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use tempfile::TempDir;

use git_auto::config::RepoHandle;
use git_auto::event::{AckAction, EngineEvent, Severity};
use git_auto::git_cli::GitRunner;
use git_auto::{publish, rollback, workspace};

fn git(dir: &Path, args: &[&str]) {
    let output = GitRunner::new().run(dir, args).expect("git should launch");
    assert!(
        output.success(),
        "git {:?} failed: {}{}",
        args,
        output.stdout,
        output.stderr
    );
}

fn last_message(dir: &Path) -> String {
    let output = GitRunner::new()
        .run(dir, &["log", "-1", "--pretty=%B"])
        .unwrap();
    output.stdout_trimmed().to_string()
}

/// A working clone with one published commit ("V-0.0.1.0") tracking a local
/// bare origin.
fn setup_published_repo() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("could not create temp dir");
    let work = temp.path().join("work");
    fs::create_dir(&work).unwrap();

    git(temp.path(), &["init", "--bare", "-b", "main", "origin.git"]);
    git(&work, &["init", "-b", "main"]);
    git(&work, &["config", "user.name", "Test User"]);
    git(&work, &["config", "user.email", "test@example.com"]);

    fs::write(work.join("README.md"), "initial\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "V-0.0.1.0"]);

    let origin = temp.path().join("origin.git");
    git(&work, &["remote", "add", "origin", origin.to_str().unwrap()]);
    git(&work, &["push", "-u", "origin", "main"]);

    (temp, work)
}

/// A second clone of the same origin, used to move the remote ahead so a
/// push from the first clone gets rejected.
fn clone_and_advance_remote(temp: &TempDir, message: &str) {
    let origin = temp.path().join("origin.git");
    git(
        temp.path(),
        &["clone", origin.to_str().unwrap(), "work2"],
    );
    let work2 = temp.path().join("work2");
    git(&work2, &["config", "user.name", "Other User"]);
    git(&work2, &["config", "user.email", "other@example.com"]);
    fs::write(work2.join("other.txt"), "remote change\n").unwrap();
    git(&work2, &["add", "."]);
    git(&work2, &["commit", "-m", message]);
    git(&work2, &["push", "origin", "main"]);
}

fn collect_events<F>(repo: &RepoHandle, run: F) -> Vec<EngineEvent>
where
    F: FnOnce(&GitRunner, &RepoHandle, &mpsc::Sender<EngineEvent>),
{
    let (tx, rx) = mpsc::channel();
    run(&GitRunner::new(), repo, &tx);
    drop(tx);
    rx.try_iter().collect()
}

fn last_status(events: &[EngineEvent]) -> &git_auto::event::StatusUpdate {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Status(update) => Some(update),
            _ => None,
        })
        .last()
        .expect("at least one status update")
}

#[test]
fn test_publish_success_creates_next_label() {
    let (_temp, work) = setup_published_repo();
    let repo = RepoHandle::new(&work);

    fs::write(work.join("README.md"), "changed\n").unwrap();
    let events = collect_events(&repo, |runner, repo, tx| {
        publish::run_publish(runner, repo, tx)
    });

    let final_status = last_status(&events);
    assert_eq!(final_status.severity, Severity::Success);
    assert!(final_status.text.contains("V-0.0.2.0"));
    assert_eq!(last_message(&work), "V-0.0.2.0");

    // The record reached the remote
    let upstream_message = {
        let output = GitRunner::new()
            .run(&work, &["log", "-1", "--pretty=%B", "origin/main"])
            .unwrap();
        output.stdout_trimmed().to_string()
    };
    assert_eq!(upstream_message, "V-0.0.2.0");
}

#[test]
fn test_publish_with_no_changes_still_publishes() {
    let (_temp, work) = setup_published_repo();
    let repo = RepoHandle::new(&work);

    let events = collect_events(&repo, |runner, repo, tx| {
        publish::run_publish(runner, repo, tx)
    });

    assert_eq!(last_status(&events).severity, Severity::Success);
    assert_eq!(last_message(&work), "V-0.0.2.0");
}

#[test]
fn test_publish_untracked_files_are_included() {
    let (_temp, work) = setup_published_repo();
    let repo = RepoHandle::new(&work);

    fs::write(work.join("new_file.txt"), "untracked\n").unwrap();
    let events = collect_events(&repo, |runner, repo, tx| {
        publish::run_publish(runner, repo, tx)
    });

    assert_eq!(last_status(&events).severity, Severity::Success);
    let output = GitRunner::new()
        .run(&work, &["show", "--stat", "--pretty=%B", "HEAD"])
        .unwrap();
    assert!(output.stdout.contains("new_file.txt"));
}

#[test]
fn test_rejected_push_requests_acknowledged_rollback() {
    let (temp, work) = setup_published_repo();
    clone_and_advance_remote(&temp, "V-2.0.0.0");
    let repo = RepoHandle::new(&work);

    fs::write(work.join("README.md"), "local change\n").unwrap();
    let events = collect_events(&repo, |runner, repo, tx| {
        publish::run_publish(runner, repo, tx)
    });

    // Status sequence ends in failure severity
    assert_eq!(last_status(&events).severity, Severity::Error);

    // The failure notification carries the push diagnostic and asks for
    // auto-recovery after acknowledgment
    match events.last().unwrap() {
        EngineEvent::Failure {
            title,
            message,
            after_ack,
        } => {
            assert_eq!(title, "Git Error");
            assert!(message.contains("rejected"), "message: {}", message);
            assert_eq!(*after_ack, Some(AckAction::RevertToLastPublished));
        }
        other => panic!("expected failure event, got {:?}", other),
    }
}

#[test]
fn test_revert_restores_upstream_state_after_failed_publish() {
    let (temp, work) = setup_published_repo();
    clone_and_advance_remote(&temp, "V-2.0.0.0");
    let repo = RepoHandle::new(&work);

    // Fail a publish so a local-only commit and an untracked file exist
    fs::write(work.join("README.md"), "local change\n").unwrap();
    let _ = collect_events(&repo, |runner, repo, tx| {
        publish::run_publish(runner, repo, tx)
    });
    fs::write(work.join("scratch.txt"), "leftover\n").unwrap();

    let events = collect_events(&repo, |runner, repo, tx| {
        rollback::run_revert_to_last_published(runner, repo, tx)
    });

    let final_status = last_status(&events);
    assert_eq!(final_status.severity, Severity::Success);
    assert!(final_status.text.contains("V-2.0.0.0"));

    // Branch tip now matches the upstream's publish record
    assert_eq!(last_message(&work), "V-2.0.0.0");
    // Untracked leftovers were cleaned
    assert!(!work.join("scratch.txt").exists());
}

#[test]
fn test_revert_without_upstream_reports_failure() {
    let temp = TempDir::new().unwrap();
    let work = temp.path().join("work");
    fs::create_dir(&work).unwrap();
    git(&work, &["init", "-b", "main"]);
    git(&work, &["config", "user.name", "Test User"]);
    git(&work, &["config", "user.email", "test@example.com"]);
    fs::write(work.join("README.md"), "initial\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "V-0.0.1.0"]);
    let repo = RepoHandle::new(&work);

    let events = collect_events(&repo, |runner, repo, tx| {
        rollback::run_revert_to_last_published(runner, repo, tx)
    });

    assert_eq!(last_status(&events).severity, Severity::Error);
    assert!(matches!(
        events.last().unwrap(),
        EngineEvent::Failure {
            after_ack: None,
            ..
        }
    ));
}

#[test]
fn test_explicit_reset_moves_tip_and_keeps_untracked_files() {
    let (_temp, work) = setup_published_repo();
    let repo = RepoHandle::new(&work);

    fs::write(work.join("README.md"), "second\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "V-0.0.2.0"]);

    let first_commit = {
        let output = GitRunner::new()
            .run(&work, &["rev-list", "--max-parents=0", "HEAD"])
            .unwrap();
        output.stdout_trimmed().to_string()
    };

    // An untracked file must survive: explicit recovery never cleans
    fs::write(work.join("keep_me.txt"), "untracked\n").unwrap();

    let events = collect_events(&repo, |runner, repo, tx| {
        rollback::run_reset_to_commit(runner, repo, &first_commit, tx)
    });

    let final_status = last_status(&events);
    assert_eq!(final_status.severity, Severity::Success);
    assert!(final_status.text.contains(&first_commit[..8]));

    assert_eq!(last_message(&work), "V-0.0.1.0");
    assert!(work.join("keep_me.txt").exists());
}

#[test]
fn test_explicit_reset_needs_no_remote() {
    // Resetting performs no fetch, so it works in a repository that has no
    // remote configured at all.
    let temp = TempDir::new().unwrap();
    let work = temp.path().join("work");
    fs::create_dir(&work).unwrap();
    git(&work, &["init", "-b", "main"]);
    git(&work, &["config", "user.name", "Test User"]);
    git(&work, &["config", "user.email", "test@example.com"]);
    fs::write(work.join("a.txt"), "one\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "first"]);
    fs::write(work.join("a.txt"), "two\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "second"]);
    let repo = RepoHandle::new(&work);

    let events = collect_events(&repo, |runner, repo, tx| {
        rollback::run_reset_to_commit(runner, repo, "HEAD~1", tx)
    });

    assert_eq!(last_status(&events).severity, Severity::Success);
    assert_eq!(last_message(&work), "first");
}

#[test]
fn test_explicit_reset_to_multibyte_ref_name_reports_success() {
    // The reset target may be a branch name rather than a hash, and branch
    // names are not limited to ASCII. The completion status must still be
    // delivered after the reset runs.
    let (_temp, work) = setup_published_repo();
    let repo = RepoHandle::new(&work);

    git(&work, &["branch", "aaaaaaaé-x"]);
    fs::write(work.join("README.md"), "second\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "V-0.0.2.0"]);

    let events = collect_events(&repo, |runner, repo, tx| {
        rollback::run_reset_to_commit(runner, repo, "aaaaaaaé-x", tx)
    });

    let final_status = last_status(&events);
    assert_eq!(final_status.severity, Severity::Success);
    assert!(final_status.text.contains("aaaaaaaé"));
    assert_eq!(last_message(&work), "V-0.0.1.0");
}

#[test]
fn test_recent_commits_lists_newest_first() {
    let (_temp, work) = setup_published_repo();
    let repo = RepoHandle::new(&work);

    fs::write(work.join("README.md"), "second\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-m", "V-0.0.2.0"]);

    let commits = rollback::recent_commits(&GitRunner::new(), &repo);
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].message, "V-0.0.2.0");
    assert_eq!(commits[1].message, "V-0.0.1.0");
    assert_eq!(commits[0].author, "Test User");
    assert!(!commits[0].hash.is_empty());
    assert!(!commits[0].age.is_empty());
}

#[test]
fn test_status_summary_reports_clean_and_dirty_trees() {
    let (_temp, work) = setup_published_repo();
    let repo = RepoHandle::new(&work);
    let runner = GitRunner::new();

    let clean = workspace::status_summary(&runner, &repo).unwrap();
    assert!(clean.contains("clean"));

    fs::write(work.join("README.md"), "dirty\n").unwrap();
    let dirty = workspace::status_summary(&runner, &repo).unwrap();
    assert!(dirty.contains("README.md"));
}

#[test]
fn test_restore_discards_changes_and_untracked_files() {
    let (_temp, work) = setup_published_repo();
    let repo = RepoHandle::new(&work);

    fs::write(work.join("README.md"), "dirty\n").unwrap();
    fs::write(work.join("junk.txt"), "untracked\n").unwrap();

    let events = collect_events(&repo, |runner, repo, tx| {
        workspace::run_restore(runner, repo, tx)
    });

    assert_eq!(last_status(&events).severity, Severity::Success);
    assert_eq!(fs::read_to_string(work.join("README.md")).unwrap(), "initial\n");
    assert!(!work.join("junk.txt").exists());
}

#[test]
fn test_pull_fast_forwards_from_remote() {
    let (temp, work) = setup_published_repo();
    clone_and_advance_remote(&temp, "V-0.0.2.0");
    let repo = RepoHandle::new(&work);

    let events = collect_events(&repo, |runner, repo, tx| {
        workspace::run_pull(runner, repo, tx)
    });

    assert_eq!(last_status(&events).severity, Severity::Success);
    assert_eq!(last_message(&work), "V-0.0.2.0");
}
