//! Pure formatting functions for terminal output.
//!
//! All display logic lives here, separated from prompting, so the rest of
//! the crate only ever hands over data.

use console::style;

use crate::event::{Severity, StatusUpdate};
use crate::rollback::CommitEntry;

/// Print a status update colored by its severity hint.
///
/// Error-severity updates go to stderr; everything else to stdout.
pub fn display_status(update: &StatusUpdate) {
    match update.severity {
        Severity::Neutral => println!("{}", style(&update.text).dim()),
        Severity::Info => println!("{} {}", style("→").cyan(), update.text),
        Severity::Warning => println!("{} {}", style("→").yellow(), update.text),
        Severity::Error => eprintln!("{} {}", style("ERROR:").red().bold(), update.text),
        Severity::Success => println!("{} {}", style("✓").green(), update.text),
    }
}

/// Print a failure notification with its full captured diagnostic text.
///
/// This is the CLI stand-in for the original's modal error dialog.
pub fn display_error_notice(title: &str, message: &str) {
    eprintln!("\n{}", style(title).red().bold());
    for line in message.lines() {
        eprintln!("  {}", line);
    }
}

/// Print the recent-commit listing used by the explicit-recovery picker.
pub fn display_commit_list(commits: &[CommitEntry]) {
    if commits.is_empty() {
        println!("{}", style("No commits available").dim());
        return;
    }

    println!("\n{}", style("Recent commits:").bold());
    for (i, commit) in commits.iter().enumerate() {
        println!(
            "  {}. {} - {}",
            i + 1,
            style(&commit.hash).cyan(),
            truncate_message(&commit.message)
        );
        println!(
            "     {}",
            style(format!("by {} • {}", commit.author, commit.age)).dim()
        );
    }
}

fn truncate_message(message: &str) -> String {
    if message.chars().count() > 50 {
        let head: String = message.chars().take(50).collect();
        format!("{}...", head)
    } else {
        message.to_string()
    }
}
