//! # MSC Common
//!
//! Shared types, error handling, logging and the GitHub API client used
//! across the msc-chart workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod github;
pub mod logging;
pub mod macros;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{MscError, Result};
pub use github::{
    GitHubClient, GitHubConfig, Issue, IssueQuery, IssueState, Label, PullRequestRef, RepositoryId,
    DEFAULT_API_URL, MAX_PER_PAGE,
};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use types::{Month, ProposalRecord, Stage};
