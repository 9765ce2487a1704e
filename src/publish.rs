//! Publish coordination: stage, commit under the derived label, push.
//!
//! The flow is linear with a single failure branch. Any non-zero exit from
//! stage/commit/push reports the captured error and asks the foreground to
//! run auto-recovery once the operator has acknowledged the failure. A
//! launch failure of the git executable is a different animal: the
//! repository state is not provably safe to touch, so it is reported as
//! fatal and never triggers rollback.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::config::RepoHandle;
use crate::event::{send_failure, send_status, AckAction, EngineEvent, Severity};
use crate::git_cli::GitRunner;
use crate::version;

/// The publish steps that can fail recoverably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    Staging,
    Committing,
    Pushing,
}

impl PublishStep {
    fn describe(&self) -> &'static str {
        match self {
            PublishStep::Staging => "staging changes",
            PublishStep::Committing => "committing",
            PublishStep::Pushing => "pushing",
        }
    }
}

/// Spawns the publish flow as a one-shot background task.
pub fn spawn_publish(repo: RepoHandle, tx: Sender<EngineEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let runner = GitRunner::new();
        run_publish(&runner, &repo, &tx);
    })
}

/// Runs the publish flow: validate, derive version, stage, commit, push.
///
/// Emits status updates throughout; the last one reflects the outcome.
pub fn run_publish(runner: &GitRunner, repo: &RepoHandle, tx: &Sender<EngineEvent>) {
    if !repo.is_valid() {
        send_status(tx, "No valid repository configured", Severity::Error);
        send_failure(
            tx,
            "No Repo",
            format!("'{}' is not a git repository.", repo.path().display()),
            None,
        );
        return;
    }

    send_status(tx, "Getting version...", Severity::Info);
    let label = version::derive_next(runner, repo.path()).to_string();

    send_status(tx, format!("Committing {}", label), Severity::Info);

    let steps: [(PublishStep, &[&str]); 3] = [
        (PublishStep::Staging, &["add", "."]),
        (
            PublishStep::Committing,
            // A clean tree still publishes a record; empty-diff commits are
            // not rejected specially.
            &["commit", "--allow-empty", "-m", label.as_str()],
        ),
        (PublishStep::Pushing, &["push"]),
    ];

    for (step, args) in steps {
        match runner.run(repo.path(), args) {
            Ok(output) if output.success() => {}
            Ok(output) => {
                send_status(
                    tx,
                    format!("Publish failed while {}", step.describe()),
                    Severity::Error,
                );
                send_failure(
                    tx,
                    "Git Error",
                    format!("Git Error:\n\n{}", output.failure_detail()),
                    Some(AckAction::RevertToLastPublished),
                );
                return;
            }
            Err(e) => {
                send_status(tx, "Error occurred", Severity::Error);
                send_failure(tx, "Error", format!("Unexpected Error:\n\n{}", e), None);
                return;
            }
        }
    }

    send_status(tx, format!("{} pushed", label), Severity::Success);
}
