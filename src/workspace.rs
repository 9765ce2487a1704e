//! Day-to-day working-tree operations that sit beside the publish engine:
//! pull, restore, and a porcelain status summary.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::config::RepoHandle;
use crate::error::{GitAutoError, Result};
use crate::event::{send_failure, send_status, EngineEvent, Severity};
use crate::git_cli::GitRunner;

/// Spawns a pull as a one-shot background task.
pub fn spawn_pull(repo: RepoHandle, tx: Sender<EngineEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let runner = GitRunner::new();
        run_pull(&runner, &repo, &tx);
    })
}

/// Fast-forwards the current branch from its remote.
pub fn run_pull(runner: &GitRunner, repo: &RepoHandle, tx: &Sender<EngineEvent>) {
    send_status(tx, "Pulling changes...", Severity::Info);

    match runner.run_checked(repo.path(), &["pull"]) {
        Ok(_) => send_status(tx, "Pull successful", Severity::Success),
        Err(GitAutoError::Git(detail)) => {
            send_status(tx, "Pull failed", Severity::Error);
            send_failure(
                tx,
                "Git Pull Error",
                format!("Failed to pull changes:\n{}", detail),
                None,
            );
        }
        Err(other) => {
            send_status(tx, "Pull failed", Severity::Error);
            send_failure(
                tx,
                "Git Pull Error",
                format!("Unexpected error:\n{}", other),
                None,
            );
        }
    }
}

/// Spawns a restore as a one-shot background task. The destructive-action
/// confirmation happens before spawning.
pub fn spawn_restore(repo: RepoHandle, tx: Sender<EngineEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let runner = GitRunner::new();
        run_restore(&runner, &repo, &tx);
    })
}

/// Restores all files to the last commit and deletes untracked files and
/// directories.
pub fn run_restore(runner: &GitRunner, repo: &RepoHandle, tx: &Sender<EngineEvent>) {
    send_status(tx, "Restoring files...", Severity::Warning);

    let result = runner
        .run_checked(repo.path(), &["restore", "."])
        .and_then(|_| runner.run_checked(repo.path(), &["clean", "-fd"]));

    match result {
        Ok(_) => send_status(tx, "Restore complete", Severity::Success),
        Err(GitAutoError::Git(detail)) => {
            send_status(tx, "Restore failed", Severity::Error);
            send_failure(
                tx,
                "Git Restore Error",
                format!("Failed to restore files:\n{}", detail),
                None,
            );
        }
        Err(other) => {
            send_status(tx, "Restore failed", Severity::Error);
            send_failure(
                tx,
                "Git Restore Error",
                format!("Unexpected error:\n{}", other),
                None,
            );
        }
    }
}

/// Returns a porcelain status summary, with a fixed message for a clean
/// tree. Runs synchronously; the caller decides how to display it.
pub fn status_summary(runner: &GitRunner, repo: &RepoHandle) -> Result<String> {
    let output = runner.run_checked(repo.path(), &["status", "--porcelain"])?;
    let summary = output.stdout_trimmed();

    if summary.is_empty() {
        Ok("Working tree clean - no changes to commit".to_string())
    } else {
        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use tempfile::TempDir;

    #[test]
    fn test_status_summary_outside_repository_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let repo = RepoHandle::new(temp_dir.path());
        let result = status_summary(&GitRunner::new(), &repo);
        assert!(matches!(result, Err(GitAutoError::Git(_))));
    }

    #[test]
    fn test_pull_launch_failure_reports_without_rollback() {
        let temp_dir = TempDir::new().unwrap();
        let repo = RepoHandle::new(temp_dir.path());
        let runner = GitRunner::with_program("definitely-not-a-real-git-binary");
        let (tx, rx) = mpsc::channel();

        run_pull(&runner, &repo, &tx);
        drop(tx);

        let events: Vec<_> = rx.try_iter().collect();
        assert!(matches!(
            events.last().unwrap(),
            EngineEvent::Failure {
                after_ack: None,
                ..
            }
        ));
    }
}
