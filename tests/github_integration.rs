use pr_export::{
    Destination, Error, ErrorKind, ExportSpec, GitHub, PullState, Repo, StateFilter,
    fetch_pull_requests, run_export,
};
use serde_json::json;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PULLS_PATH: &str = "/repos/octo/widgets/pulls";

fn spec(state: StateFilter) -> ExportSpec {
    ExportSpec {
        repo: Repo::new("octo", "widgets").unwrap(),
        state,
        api_url: None,
    }
}

fn client(server: &MockServer) -> GitHub {
    GitHub::new(Some(&server.uri()), None).unwrap()
}

fn error_body(message: &str) -> serde_json::Value {
    json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    })
}

async fn mount_failing_pulls(server: &MockServer, status: u16, message: &str) {
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(error_body(message)))
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test]
async fn test_listing_follows_commits_and_comments_urls() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(query_param("state", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "number": 7,
            "title": "Fix widget alignment",
            "user": { "login": "alice" },
            "state": "closed",
            "html_url": "https://github.com/octo/widgets/pull/7",
            "created_at": "2024-03-01T09:00:00Z",
            "updated_at": "2024-03-02T09:00:00Z",
            "merged_at": "2024-03-02T08:00:00Z",
            "commits_url": format!("{base}{PULLS_PATH}/7/commits"),
            "comments_url": format!("{base}/repos/octo/widgets/issues/7/comments"),
            "requested_reviewers": [{ "login": "bob", "id": 2, "type": "User" }]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{PULLS_PATH}/7/commits")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "sha": "deadbeef",
            "commit": {
                "message": "Align widgets",
                "committer": { "name": "Alice", "email": "alice@example.com" }
            }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/issues/7/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "user": { "login": "carol" }, "body": "Looks good" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let prs = fetch_pull_requests(&spec(StateFilter::All), &client(&server))
        .await
        .unwrap();

    assert_eq!(prs.len(), 1);
    let pr = &prs[0];
    assert_eq!(pr.number, 7);
    assert_eq!(pr.author, "alice");
    assert_eq!(pr.state, PullState::Merged);
    assert_eq!(pr.commits.len(), 1);
    assert_eq!(pr.commits[0].sha, "deadbeef");
    assert_eq!(pr.commits[0].committer, "Alice");
    assert_eq!(pr.comments.len(), 1);
    assert_eq!(pr.comments[0].author, "carol");
    assert_eq!(pr.reviewers[0].login, "bob");
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_token_is_sent_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let github = GitHub::new(Some(&server.uri()), Some("test-token".to_string())).unwrap();
    let prs = fetch_pull_requests(&spec(StateFilter::Open), &github)
        .await
        .unwrap();
    assert!(prs.is_empty());
}

#[tokio::test]
async fn test_not_found_is_status_error() {
    let server = MockServer::start().await;
    mount_failing_pulls(&server, 404, "Not Found").await;

    let err = fetch_pull_requests(&spec(StateFilter::Open), &client(&server))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Request);
    assert!(
        matches!(err, Error::Status { status: 404, ref url } if url.contains(PULLS_PATH)),
        "unexpected error: {err:?}"
    );
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    mount_failing_pulls(&server, 500, "Server Error").await;

    let err = fetch_pull_requests(&spec(StateFilter::Open), &client(&server))
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Status { status: 500, .. }),
        "unexpected error: {err:?}"
    );
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_failed_listing_writes_no_csv() {
    let server = MockServer::start().await;
    mount_failing_pulls(&server, 500, "Server Error").await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widgets_octo.csv");

    let err = run_export(
        &spec(StateFilter::Open),
        &Destination::Csv(path.clone()),
        &client(&server),
        &mut std::io::sink(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Request);
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
