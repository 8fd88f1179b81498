use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::{
    error::Result,
    payload::{CommentPayload, CommitPayload, GHOST_LOGIN, PullPayload, PullStatePayload},
    types::{Comment, Commit, ExportSpec, Forge, PullRequest, PullState, Reviewer},
};

/// Fetches the pull-request listing described by `spec`.
///
/// Each pull request costs two further requests, one for its commits and one
/// for its comments. The first failing request aborts the whole fetch.
pub async fn fetch_pull_requests<F>(spec: &ExportSpec, forge: &F) -> Result<Vec<PullRequest>>
where
    F: Forge + Sync,
{
    fetch_pull_requests_at(spec, forge, Utc::now()).await
}

/// Same as [`fetch_pull_requests`] with `time_open` measured against `now`.
pub async fn fetch_pull_requests_at<F>(
    spec: &ExportSpec,
    forge: &F,
    now: DateTime<Utc>,
) -> Result<Vec<PullRequest>>
where
    F: Forge + Sync,
{
    let pulls = forge.list_pulls(&spec.repo, spec.state).await?;
    debug!(repo = %spec.repo, count = pulls.len(), "listed pull requests");

    let mut pull_requests = Vec::with_capacity(pulls.len());
    for pull in pulls {
        let commits = forge.list_commits(&pull.commits_url).await?;
        let comments = forge.list_comments(&pull.comments_url).await?;
        pull_requests.push(to_pull_request(pull, commits, comments, now));
    }

    info!(repo = %spec.repo, count = pull_requests.len(), "fetched pull requests");
    Ok(pull_requests)
}

pub fn time_open(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - created_at).max(Duration::zero())
}

fn to_pull_request(
    pull: PullPayload,
    commits: Vec<CommitPayload>,
    comments: Vec<CommentPayload>,
    now: DateTime<Utc>,
) -> PullRequest {
    let state = match (pull.state, pull.merged_at) {
        (_, Some(_)) => PullState::Merged,
        (PullStatePayload::Open, None) => PullState::Open,
        (PullStatePayload::Closed, None) => PullState::Closed,
    };

    PullRequest {
        number: pull.number,
        title: pull.title,
        author: pull
            .user
            .map_or_else(|| GHOST_LOGIN.to_string(), |user| user.login),
        state,
        url: pull.html_url,
        created_at: pull.created_at,
        updated_at: pull.updated_at,
        time_open: time_open(pull.created_at, now),
        commits: commits
            .into_iter()
            .map(|commit| Commit {
                sha: commit.sha,
                message: commit.commit.message,
                committer: commit
                    .commit
                    .committer
                    .map(|actor| actor.name)
                    .unwrap_or_default(),
            })
            .collect(),
        comments: comments
            .into_iter()
            .map(|comment| Comment {
                author: comment
                    .user
                    .map_or_else(|| GHOST_LOGIN.to_string(), |user| user.login),
                body: comment.body.unwrap_or_default(),
            })
            .collect(),
        reviewers: pull
            .requested_reviewers
            .into_iter()
            .map(|reviewer| Reviewer {
                login: reviewer.login,
                id: reviewer.id,
                kind: reviewer.kind,
            })
            .collect(),
    }
}
