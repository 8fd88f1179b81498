use std::{fmt, sync::LazyLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use regex::Regex;
use serde::Serialize;

use crate::{
    error::{Error, Result},
    payload::{CommentPayload, CommitPayload, PullPayload},
};

static OWNER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,37}[A-Za-z0-9])?$")
        .expect("owner pattern is valid")
});

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]{1,100}$").expect("name pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("repository owner is not set")]
    MissingOwner,
    #[error("repository name is not set")]
    MissingName,
    #[error("invalid repository owner '{0}'")]
    InvalidOwner(String),
    #[error("invalid repository name '{0}'")]
    InvalidName(String),
    #[error("repository must be in format 'owner/name', got: '{0}'")]
    Format(String),
}

impl From<RepoError> for Error {
    fn from(err: RepoError) -> Self {
        Error::Configuration(err.to_string())
    }
}

/// A validated `owner/name` pair identifying a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into().trim().to_string();
        let name = name.into().trim().to_string();

        if owner.is_empty() {
            return Err(RepoError::MissingOwner);
        }
        if name.is_empty() {
            return Err(RepoError::MissingName);
        }
        if !OWNER_PATTERN.is_match(&owner) {
            return Err(RepoError::InvalidOwner(owner));
        }
        if !NAME_PATTERN.is_match(&name) || name == "." || name == ".." {
            return Err(RepoError::InvalidName(name));
        }

        Ok(Self { owner, name })
    }

    /// Accepts either `owner/name` or a repository web URL such as
    /// `https://github.com/owner/name(.git)`.
    pub fn parse(input: &str) -> Result<Self, RepoError> {
        let input = input.trim();
        if input.starts_with("https://") || input.starts_with("http://") {
            return Self::parse_url(input);
        }

        match input.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] => Self::new(*owner, *name),
            _ => Err(RepoError::Format(input.to_string())),
        }
    }

    pub fn parse_url(input: &str) -> Result<Self, RepoError> {
        let url = url::Url::parse(input).map_err(|_| RepoError::Format(input.to_string()))?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|segment| !segment.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [owner, name] => Self::new(*owner, name.trim_end_matches(".git")),
            _ => Err(RepoError::Format(input.to_string())),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Which pull requests the listing endpoint should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::Open => "open",
            StateFilter::Closed => "closed",
            StateFilter::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PullState {
    Open,
    Closed,
    Merged,
}

impl PullState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PullState::Open => "open",
            PullState::Closed => "closed",
            PullState::Merged => "merged",
        }
    }
}

impl fmt::Display for PullState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub committer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reviewer {
    pub login: String,
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Snapshot of a single pull request, as exported.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub state: PullState,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub time_open: Duration,
    pub commits: Vec<Commit>,
    pub comments: Vec<Comment>,
    pub reviewers: Vec<Reviewer>,
}

/// Everything needed to fetch a listing.
#[derive(Debug, Clone)]
pub struct ExportSpec {
    pub repo: Repo,
    pub state: StateFilter,
    pub api_url: Option<String>,
}

/// Where the exporter sends its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Csv(std::path::PathBuf),
}

/// Read access to a code-hosting platform's pull-request API.
///
/// `list_commits` and `list_comments` take the hypermedia URLs the listing
/// returns for each pull request.
#[async_trait]
pub trait Forge {
    async fn list_pulls(&self, repo: &Repo, state: StateFilter) -> Result<Vec<PullPayload>>;

    async fn list_commits(&self, url: &str) -> Result<Vec<CommitPayload>>;

    async fn list_comments(&self, url: &str) -> Result<Vec<CommentPayload>>;
}
