//! Working-tree recovery to a known-good published state.
//!
//! Two entry points share the same step machinery:
//!
//! - auto-recovery resets the branch to its upstream tracking reference
//!   after a failed publish (fetch, resolve `@{u}`, hard reset, clean);
//! - explicit recovery resets to an operator-chosen commit, with no fetch
//!   and no untracked-file cleanup.
//!
//! A recovery failure is terminal for the attempt: it is reported and left
//! for the operator to retry manually.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::config::RepoHandle;
use crate::error::{GitAutoError, Result};
use crate::event::{send_failure, send_status, EngineEvent, Severity};
use crate::git_cli::GitRunner;

/// One entry of the recent-history listing shown for explicit recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitEntry {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub age: String,
}

/// How many history entries the explicit-recovery listing fetches.
const RECENT_COMMIT_LIMIT: usize = 20;

/// Spawns auto-recovery as a one-shot background task.
pub fn spawn_revert_to_last_published(repo: RepoHandle, tx: Sender<EngineEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let runner = GitRunner::new();
        run_revert_to_last_published(&runner, &repo, &tx);
    })
}

/// Resets the working tree and branch tip to the upstream tracking
/// reference, then reports the upstream's latest publish-record message as
/// the new known-good state.
pub fn run_revert_to_last_published(
    runner: &GitRunner,
    repo: &RepoHandle,
    tx: &Sender<EngineEvent>,
) {
    send_status(tx, "Reverting to last published...", Severity::Warning);

    match revert_steps(runner, repo) {
        Ok(known_good) => send_status(tx, known_good, Severity::Success),
        Err(GitAutoError::Git(detail)) => {
            send_status(tx, "Revert failed", Severity::Error);
            send_failure(
                tx,
                "Revert Error",
                format!("Failed to revert to last published commit:\n{}", detail),
                None,
            );
        }
        Err(other) => {
            send_status(tx, "Revert failed", Severity::Error);
            send_failure(
                tx,
                "Revert Error",
                format!("Unexpected error:\n{}", other),
                None,
            );
        }
    }
}

fn revert_steps(runner: &GitRunner, repo: &RepoHandle) -> Result<String> {
    runner.run_checked(repo.path(), &["fetch"])?;

    // The upstream may have been reconfigured since the last run, so it is
    // resolved fresh every time.
    let upstream = runner
        .run_checked(
            repo.path(),
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
        )?
        .stdout_trimmed()
        .to_string();

    runner.run_checked(repo.path(), &["reset", "--hard", &upstream])?;
    runner.run_checked(repo.path(), &["clean", "-fd"])?;

    let message = runner.run_checked(repo.path(), &["log", "-1", "--pretty=%B", &upstream])?;
    let known_good = message
        .stdout
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .unwrap_or_else(|| "Last successful commit".to_string());

    Ok(known_good)
}

/// Spawns explicit recovery as a one-shot background task. Destructive-action
/// confirmation is the caller's job and must happen before spawning.
pub fn spawn_reset_to_commit(
    repo: RepoHandle,
    commit_hash: String,
    tx: Sender<EngineEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runner = GitRunner::new();
        run_reset_to_commit(&runner, &repo, &commit_hash, &tx);
    })
}

/// Moves the branch tip to `commit_hash`, discarding working-tree and staged
/// changes. Performs no fetch and no untracked-file cleanup.
pub fn run_reset_to_commit(
    runner: &GitRunner,
    repo: &RepoHandle,
    commit_hash: &str,
    tx: &Sender<EngineEvent>,
) {
    send_status(tx, "Resetting to commit...", Severity::Warning);

    match runner.run_checked(repo.path(), &["reset", "--hard", commit_hash]) {
        Ok(_) => {
            send_status(
                tx,
                format!("Reset complete ({})", short_hash(commit_hash)),
                Severity::Success,
            );
        }
        Err(GitAutoError::Git(detail)) => {
            send_status(tx, "Reset failed", Severity::Error);
            send_failure(
                tx,
                "Git Reset Error",
                format!("Failed to reset to commit:\n{}", detail),
                None,
            );
        }
        Err(other) => {
            send_status(tx, "Reset failed", Severity::Error);
            send_failure(
                tx,
                "Git Reset Error",
                format!("Unexpected error:\n{}", other),
                None,
            );
        }
    }
}

/// Lists up to 20 recent publish records for the explicit-recovery picker.
///
/// Unreadable history is not an error here: it comes back as an empty list
/// so the surface can show "no commits available".
pub fn recent_commits(runner: &GitRunner, repo: &RepoHandle) -> Vec<CommitEntry> {
    let limit = format!("-{}", RECENT_COMMIT_LIMIT);
    let output = match runner.run(
        repo.path(),
        &["log", &limit, "--pretty=format:%h|%s|%an|%ar"],
    ) {
        Ok(output) if output.success() => output,
        _ => return Vec::new(),
    };

    output
        .stdout
        .lines()
        .filter_map(parse_commit_line)
        .collect()
}

fn parse_commit_line(line: &str) -> Option<CommitEntry> {
    let mut parts = line.splitn(4, '|');
    let hash = parts.next()?.to_string();
    let message = parts.next()?.to_string();
    let author = parts.next()?.to_string();
    let age = parts.next()?.to_string();
    if hash.is_empty() {
        return None;
    }
    Some(CommitEntry {
        hash,
        message,
        author,
        age,
    })
}

fn short_hash(hash: &str) -> &str {
    // The target may be any ref name, so truncate on a char boundary.
    match hash.char_indices().nth(8) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}
