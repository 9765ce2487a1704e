use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use anyhow::{anyhow, bail, Result};
use clap::Parser;

use git_auto::config::{self, Config, RepoHandle};
use git_auto::event::{AckAction, EngineEvent, Severity, StatusUpdate};
use git_auto::git_cli::GitRunner;
use git_auto::{publish, rollback, ui, workspace};

#[derive(clap::Parser)]
#[command(
    name = "git-auto",
    about = "Publish pending changes under an auto-derived version label, with automatic rollback"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Operate on this repository instead of the configured one")]
    repo: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Stage, commit, and push pending changes under the next version label
    Publish,
    /// Revert the working tree to the last published state
    Revert,
    /// Hard-reset the branch tip to a chosen commit
    Reset {
        #[arg(long, help = "Target commit hash; prompts interactively when omitted")]
        commit: Option<String>,
    },
    /// Show the 20 most recent commits
    Log,
    /// Pull the latest changes from the remote
    Pull,
    /// Restore all files to the last commit and delete untracked files
    Restore,
    /// Show a short working-tree status
    Status,
    /// Configure the repository to operate on
    SetRepo { path: String },
    /// Forget the configured repository
    ClearRepo,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match &args.command {
        Command::SetRepo { path } => return cmd_set_repo(path, args.config.as_deref()),
        Command::ClearRepo => return cmd_clear_repo(),
        _ => {}
    }

    // Configuration problems are reported here, before any background task
    // is started.
    let repo = resolve_repo(args.repo.as_deref(), args.config.as_deref())?;

    match args.command {
        Command::Publish => run_engine_task(&repo, publish::spawn_publish),
        Command::Revert => run_engine_task(&repo, rollback::spawn_revert_to_last_published),
        Command::Reset { commit } => cmd_reset(&repo, commit),
        Command::Log => {
            let commits = rollback::recent_commits(&GitRunner::new(), &repo);
            ui::display_commit_list(&commits);
            Ok(())
        }
        Command::Pull => run_engine_task(&repo, workspace::spawn_pull),
        Command::Restore => cmd_restore(&repo),
        Command::Status => cmd_status(&repo),
        Command::SetRepo { .. } | Command::ClearRepo => unreachable!(),
    }
}

/// Resolves the repository to operate on: an explicit `--repo` override, or
/// the configured one.
fn resolve_repo(repo_override: Option<&str>, config_path: Option<&str>) -> Result<RepoHandle> {
    let handle = match repo_override {
        Some(path) => RepoHandle::new(path),
        None => config::load_config(config_path)?
            .repo_handle()
            .ok_or_else(|| {
                anyhow!("No repository configured. Run 'git-auto set-repo <path>' first.")
            })?,
    };

    if !handle.is_valid() {
        bail!("'{}' is not a git repository", handle.path().display());
    }

    Ok(handle)
}

/// Spawns one background engine task and drains its events until it
/// finishes.
///
/// The drain loop is the only place that touches the terminal while a task
/// runs; background tasks communicate exclusively through the channel.
fn run_engine_task<F>(repo: &RepoHandle, spawn: F) -> Result<()>
where
    F: FnOnce(RepoHandle, Sender<EngineEvent>) -> JoinHandle<()>,
{
    let (tx, rx) = mpsc::channel();
    let handle = spawn(repo.clone(), tx);
    drain_events(repo, rx)?;
    let _ = handle.join();
    Ok(())
}

fn drain_events(repo: &RepoHandle, rx: Receiver<EngineEvent>) -> Result<()> {
    for event in rx {
        match event {
            EngineEvent::Status(update) => ui::display_status(&update),
            EngineEvent::Failure {
                title,
                message,
                after_ack,
            } => {
                // The operator sees the failure reason before the working
                // tree changes again.
                ui::acknowledge(&title, &message)?;
                if let Some(AckAction::RevertToLastPublished) = after_ack {
                    run_engine_task(repo, rollback::spawn_revert_to_last_published)?;
                }
            }
        }
    }
    Ok(())
}

fn cmd_reset(repo: &RepoHandle, commit: Option<String>) -> Result<()> {
    let commit_hash = match commit {
        Some(hash) => hash,
        None => {
            let commits = rollback::recent_commits(&GitRunner::new(), repo);
            match ui::select_commit(&commits)? {
                Some(entry) => entry.hash,
                None => {
                    println!("Operation cancelled by user.");
                    return Ok(());
                }
            }
        }
    };

    let confirmed = ui::confirm_action(&format!(
        "This will reset to commit {} and lose all changes. Are you sure?",
        commit_hash
    ))?;
    if !confirmed {
        println!("Operation cancelled by user.");
        return Ok(());
    }

    run_engine_task(repo, move |repo, tx| {
        rollback::spawn_reset_to_commit(repo, commit_hash, tx)
    })
}

fn cmd_restore(repo: &RepoHandle) -> Result<()> {
    let confirmed = ui::confirm_action(
        "This will restore all files to the last commit and delete untracked files. Are you sure?",
    )?;
    if !confirmed {
        println!("Operation cancelled by user.");
        return Ok(());
    }

    run_engine_task(repo, workspace::spawn_restore)
}

fn cmd_status(repo: &RepoHandle) -> Result<()> {
    let summary = workspace::status_summary(&GitRunner::new(), repo)?;
    println!("Repository: {}\n\n{}", repo.name(), summary);
    Ok(())
}

fn cmd_set_repo(path: &str, config_path: Option<&str>) -> Result<()> {
    let canonical = std::fs::canonicalize(path)
        .map_err(|e| anyhow!("cannot resolve path '{}': {}", path, e))?;
    let handle = RepoHandle::new(&canonical);
    if !handle.is_valid() {
        bail!("Selected folder is not a git repository.");
    }

    let config = Config {
        repo_path: Some(canonical),
    };
    config::save_config(&config, config_path)?;

    ui::display_status(&StatusUpdate {
        text: format!("Repo saved: {}", handle.name()),
        severity: Severity::Success,
    });
    Ok(())
}

fn cmd_clear_repo() -> Result<()> {
    config::clear_saved_config()?;
    ui::display_status(&StatusUpdate {
        text: "Repo reset".to_string(),
        severity: Severity::Neutral,
    });
    Ok(())
}
