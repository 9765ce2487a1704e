pub mod config;
pub mod error;
pub mod event;
pub mod git_cli;
pub mod publish;
pub mod rollback;
pub mod ui;
pub mod version;
pub mod workspace;

pub use error::{GitAutoError, Result};
