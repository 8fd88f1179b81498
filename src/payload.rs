//! Wire shapes of the REST responses the exporter reads.
//!
//! Only the fields that end up in a [`PullRequest`](crate::PullRequest) are
//! declared; everything else in the response is ignored. Fields that GitHub
//! documents as nullable are `Option`s.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Login substituted for accounts that no longer exist.
pub const GHOST_LOGIN: &str = "ghost";

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewerPayload {
    pub login: String,
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullStatePayload {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullPayload {
    pub number: u64,
    pub title: String,
    pub user: Option<UserPayload>,
    #[serde(default)]
    pub state: PullStatePayload,
    #[serde(default)]
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    pub commits_url: String,
    pub comments_url: String,
    #[serde(default)]
    pub requested_reviewers: Vec<ReviewerPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitActorPayload {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetailPayload {
    pub message: String,
    pub committer: Option<GitActorPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitPayload {
    pub sha: String,
    pub commit: CommitDetailPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    pub user: Option<UserPayload>,
    #[serde(default)]
    pub body: Option<String>,
}
