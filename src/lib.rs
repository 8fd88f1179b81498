//! pr-export: pull-request listing exporter.
//!
//! Fetches a repository's pull requests from GitHub, together with each
//! one's commits, comments and requested reviewers, and either prints them
//! or writes them to a CSV file. The platform API sits behind the [`Forge`]
//! trait so the pipeline can run against other sources.

pub mod cli;
pub mod error;
pub mod export;
pub mod github;
pub mod payload;
pub mod query;
pub mod types;

pub use cli::parse_args;
pub use error::{Error, ErrorKind, Result};
pub use export::{
    CSV_HEADERS, default_csv_path, export, format_time_open, print_pull_requests, run_export,
    save_csv, write_csv,
};
pub use github::GitHub;
pub use query::{fetch_pull_requests, fetch_pull_requests_at};
pub use types::{
    Comment, Commit, Destination, ExportSpec, Forge, PullRequest, PullState, Repo, RepoError,
    Reviewer, StateFilter,
};
