//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure display functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;

use crate::rollback::CommitEntry;

pub mod formatter;

pub use formatter::{display_commit_list, display_error_notice, display_status};

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive) as confirmation. Default is "no"
/// if user presses Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Shows a failure notification and blocks until the operator dismisses it.
///
/// This is the acknowledgment gate: whatever follows a failure (such as
/// auto-recovery) must not start until this returns.
pub fn acknowledge(title: &str, message: &str) -> Result<()> {
    formatter::display_error_notice(title, message);

    print!("\nPress Enter to continue... ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(())
}

/// Prompts user to pick a commit from the recent-history listing.
///
/// Displays the numbered list and accepts a 1-based index. Empty input
/// cancels the selection.
///
/// # Returns
/// * `Ok(Some(entry))` - The selected commit
/// * `Ok(None)` - If the user cancelled or no commits are available
/// * `Err` - If selection is invalid
pub fn select_commit(commits: &[CommitEntry]) -> Result<Option<CommitEntry>> {
    if commits.is_empty() {
        formatter::display_commit_list(commits);
        return Ok(None);
    }

    formatter::display_commit_list(commits);

    print!(
        "\nSelect a commit (1-{}) or press Enter to cancel: ",
        commits.len()
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let selection = input.trim();

    if selection.is_empty() {
        return Ok(None);
    }

    let index = selection.parse::<usize>().unwrap_or(0);
    if index > 0 && index <= commits.len() {
        Ok(Some(commits[index - 1].clone()))
    } else {
        Err(anyhow::anyhow!("Invalid selection"))
    }
}
