//! Synchronous invocation of the external `git` executable.
//!
//! This is the only integration point with version control: every engine
//! operation goes through [GitRunner::run], which pins the working directory
//! to the repository, forbids interactive prompts, and reports failure
//! structurally (exit code plus captured stderr) instead of crashing the
//! caller. Retry policy belongs to callers; the runner never retries.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{GitAutoError, Result};

/// Captured result of one git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Whether the invocation exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout with trailing newlines removed.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim_end_matches(['\r', '\n'])
    }

    /// Best available diagnostic for a failed invocation: stderr, then
    /// stdout, then the bare exit code.
    pub fn failure_detail(&self) -> String {
        if !self.stderr.trim().is_empty() {
            self.stderr.trim_end().to_string()
        } else if !self.stdout.trim().is_empty() {
            self.stdout.trim_end().to_string()
        } else {
            format!("git exited with code {}", self.exit_code)
        }
    }
}

/// Runs git commands against a repository working directory.
pub struct GitRunner {
    program: String,
}

impl GitRunner {
    /// Creates a runner that invokes `git` from PATH.
    pub fn new() -> Self {
        GitRunner {
            program: "git".to_string(),
        }
    }

    /// Creates a runner with an explicit executable, used by tests to
    /// exercise the launch-failure path.
    pub fn with_program(program: impl Into<String>) -> Self {
        GitRunner {
            program: program.into(),
        }
    }

    /// Runs one git command synchronously with the working directory pinned
    /// to `repo_path`.
    ///
    /// A non-zero exit code is not an `Err`: it comes back as a [GitOutput]
    /// with the captured stderr, and the caller decides what it means.
    /// `Err` is reserved for the executable itself failing to launch
    /// (missing binary, permission problem).
    pub fn run(&self, repo_path: &Path, args: &[&str]) -> Result<GitOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(repo_path)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            // CREATE_NO_WINDOW
            cmd.creation_flags(0x0800_0000);
        }

        let output = cmd.output().map_err(|e| {
            GitAutoError::launch(format!("{} {}: {}", self.program, args.join(" "), e))
        })?;

        Ok(GitOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Like [GitRunner::run], but folds a non-zero exit into
    /// [GitAutoError::Git] carrying the captured diagnostic. For callers
    /// that treat any failed step the same way.
    pub fn run_checked(&self, repo_path: &Path, args: &[&str]) -> Result<GitOutput> {
        let output = self.run(repo_path, args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(GitAutoError::git(output.failure_detail()))
        }
    }
}

impl Default for GitRunner {
    fn default() -> Self {
        GitRunner::new()
    }
}
