//! Version label derivation.
//!
//! Publish records carry a 4-component label (`V-major.minor.patch.build`)
//! as their commit message. The next label is always computed from the most
//! recent record; nothing is persisted outside the history itself.

use std::fmt;
use std::path::Path;

use crate::git_cli::GitRunner;

/// A 4-component version label embedded in publish record messages.
///
/// `patch` stays within `0..=9`; incrementing past 9 rolls over into
/// `minor`. `major` and `build` are never auto-incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionLabel {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

/// Fallback label when no prior label can be derived.
pub const BASELINE: VersionLabel = VersionLabel {
    major: 0,
    minor: 0,
    patch: 1,
    build: 0,
};

impl VersionLabel {
    pub fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        VersionLabel {
            major,
            minor,
            patch,
            build,
        }
    }

    /// Extracts a label from a publish record message.
    ///
    /// Only the first line is significant. Returns `None` when the line
    /// does not contain the `V-` marker followed by four dot-separated
    /// integers.
    pub fn parse(message: &str) -> Option<Self> {
        let first_line = message.lines().next()?;
        let re = regex::Regex::new(r"V-(\d+)\.(\d+)\.(\d+)\.(\d+)").ok()?;
        let captures = re.captures(first_line)?;

        let major = captures[1].parse::<u32>().ok()?;
        let minor = captures[2].parse::<u32>().ok()?;
        let patch = captures[3].parse::<u32>().ok()?;
        let build = captures[4].parse::<u32>().ok()?;

        Some(VersionLabel::new(major, minor, patch, build))
    }

    /// Returns the label that follows this one.
    ///
    /// Increments `patch`; a result of 10 or more rolls over to 0 and
    /// increments `minor`. `major` and `build` pass through unchanged.
    pub fn next(&self) -> Self {
        let mut next = *self;
        next.patch += 1;
        if next.patch >= 10 {
            next.minor += 1;
            next.patch = 0;
        }
        next
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V-{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

/// Derives the label for the next publish attempt.
///
/// Reads the most recent publish record's message and increments its label.
/// Every failure path (no history, unreadable record, no pattern match)
/// silently degrades to [BASELINE]; this never reports an error to the
/// caller.
pub fn derive_next(runner: &GitRunner, repo_path: &Path) -> VersionLabel {
    let output = match runner.run(repo_path, &["log", "-1", "--pretty=%B"]) {
        Ok(output) if output.success() => output,
        _ => return BASELINE,
    };

    match VersionLabel::parse(&output.stdout) {
        Some(label) => label.next(),
        None => BASELINE,
    }
}
