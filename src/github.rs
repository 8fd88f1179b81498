use std::process::Command;

use async_trait::async_trait;
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    payload::{CommentPayload, CommitPayload, PullPayload},
    types::{Forge, Repo, StateFilter},
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Looks up a token without requiring one; public repositories can be read
/// anonymously at a lower rate limit.
pub fn get_github_token() -> Option<String> {
    // Prefer environment variables over gh CLI to avoid subprocess overhead.
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// [`Forge`] backed by the GitHub REST API.
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    pub fn new(api_url: Option<&str>, token: Option<String>) -> Result<Self> {
        // A failed call surfaces to the caller as-is.
        let mut builder = Octocrab::builder().add_retry_config(RetryConfig::None);

        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| Error::Configuration(format!("invalid API URL '{url}': {e}")))?;
        }

        match token {
            Some(token) => builder = builder.personal_token(token),
            None => warn!("no GitHub token found, making unauthenticated requests"),
        }

        let client = builder
            .build()
            .map_err(|e| Error::request(api_url.unwrap_or(DEFAULT_API_URL), e))?;

        Ok(Self { client })
    }

    /// Creates a client using whatever credentials are available locally.
    pub fn from_env(api_url: Option<&str>) -> Result<Self> {
        Self::new(api_url, get_github_token())
    }

    async fn get_json<R, P>(&self, route: &str, parameters: Option<&P>) -> Result<R>
    where
        R: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        debug!(route, "GET");
        self.client
            .get(route, parameters)
            .await
            .map_err(|err| map_octocrab_error(route, err))
    }
}

fn map_octocrab_error(url: &str, err: octocrab::Error) -> Error {
    match err {
        octocrab::Error::GitHub { source, .. } => Error::Status {
            url: url.to_string(),
            status: source.status_code.as_u16(),
        },
        other => Error::request(url, other),
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn list_pulls(&self, repo: &Repo, state: StateFilter) -> Result<Vec<PullPayload>> {
        let route = format!("/repos/{}/{}/pulls", repo.owner(), repo.name());
        self.get_json(&route, Some(&[("state", state.as_str())]))
            .await
    }

    async fn list_commits(&self, url: &str) -> Result<Vec<CommitPayload>> {
        self.get_json(url, None::<&()>).await
    }

    async fn list_comments(&self, url: &str) -> Result<Vec<CommentPayload>> {
        self.get_json(url, None::<&()>).await
    }
}
