//! wiremock-based GitHub mock server for testing.
//!
//! Provides `GitHubMockServer` for HTTP-level mocking of the REST endpoints
//! `OctocrabClient` calls.
//!
//! # Usage
//!
//! ```ignore
//! let mock = GitHubMockServer::start().await;
//! let ctx = mock.repo("owner", "repo");
//!
//! ctx.open_issues(&[(1, &["SEV-1"])]).await;
//! ctx.issue(1).comments(&[(10, "Resolution Date: 2024-01-21")]).await;
//! ctx.issue(1).create_comment(11).await;
//! ctx.issue(1).add_labels().await;
//! ctx.issue(1).remove_label("Fix timeline: 3 weeks").await;
//! ctx.comment(10).update("~~Resolution Date: 2024-01-21~~").await;
//! ctx.create_label().await;
//! ctx.latest_release("v1.3.0").await;
//! ```

use percent_encoding::utf8_percent_encode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::client::OctocrabClient;
use super::issue::LABEL_SEGMENT;

/// Create a mock user JSON object for octocrab Author model.
fn mock_user(login: &str) -> serde_json::Value {
    json!({
        "login": login,
        "id": 1,
        "node_id": "U_test",
        "avatar_url": "https://avatars.githubusercontent.com/u/1",
        "gravatar_id": "",
        "url": format!("https://api.github.com/users/{login}"),
        "html_url": format!("https://github.com/{login}"),
        "followers_url": format!("https://api.github.com/users/{login}/followers"),
        "following_url": format!("https://api.github.com/users/{login}/following{{/other_user}}"),
        "gists_url": format!("https://api.github.com/users/{login}/gists{{/gist_id}}"),
        "starred_url": format!("https://api.github.com/users/{login}/starred{{/owner}}{{/repo}}"),
        "subscriptions_url": format!("https://api.github.com/users/{login}/subscriptions"),
        "organizations_url": format!("https://api.github.com/users/{login}/orgs"),
        "repos_url": format!("https://api.github.com/users/{login}/repos"),
        "events_url": format!("https://api.github.com/users/{login}/events{{/privacy}}"),
        "received_events_url": format!("https://api.github.com/users/{login}/received_events"),
        "type": "User",
        "site_admin": false
    })
}

/// Create a mock label JSON object for octocrab Label model.
fn mock_label(owner: &str, repo: &str, name: &str, color: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "node_id": "LA_test",
        "url": format!("https://api.github.com/repos/{owner}/{repo}/labels/{name}"),
        "name": name,
        "color": color,
        "default": false,
        "description": null
    })
}

/// Create a mock comment JSON object for octocrab Comment model.
fn mock_comment(
    owner: &str,
    repo: &str,
    issue_number: u64,
    comment_id: u64,
    body: &str,
    created_at: &str,
) -> serde_json::Value {
    json!({
        "id": comment_id,
        "node_id": format!("IC_{comment_id}"),
        "url": format!("https://api.github.com/repos/{owner}/{repo}/issues/comments/{comment_id}"),
        "html_url": format!("https://github.com/{owner}/{repo}/issues/{issue_number}#issuecomment-{comment_id}"),
        "issue_url": format!("https://api.github.com/repos/{owner}/{repo}/issues/{issue_number}"),
        "body": body,
        "author_association": "NONE",
        "user": mock_user("github-actions[bot]"),
        "created_at": created_at,
        "updated_at": created_at
    })
}

/// Create a mock issue JSON object for octocrab Issue model.
fn mock_issue(owner: &str, repo: &str, issue_number: u64, labels: &[&str]) -> serde_json::Value {
    let labels: Vec<_> = labels
        .iter()
        .map(|l| mock_label(owner, repo, l, "ededed"))
        .collect();
    json!({
        "id": issue_number,
        "node_id": "I_test",
        "url": format!("https://api.github.com/repos/{owner}/{repo}/issues/{issue_number}"),
        "repository_url": format!("https://api.github.com/repos/{owner}/{repo}"),
        "labels_url": format!("https://api.github.com/repos/{owner}/{repo}/issues/{issue_number}/labels{{/name}}"),
        "comments_url": format!("https://api.github.com/repos/{owner}/{repo}/issues/{issue_number}/comments"),
        "events_url": format!("https://api.github.com/repos/{owner}/{repo}/issues/{issue_number}/events"),
        "html_url": format!("https://github.com/{owner}/{repo}/issues/{issue_number}"),
        "number": issue_number,
        "state": "open",
        "title": format!("Incident {issue_number}"),
        "body": null,
        "user": mock_user("reporter"),
        "labels": labels,
        "assignees": [],
        "author_association": "MEMBER",
        "milestone": null,
        "locked": false,
        "comments": 0,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

/// Create a mock release JSON object for octocrab Release model.
fn mock_release(owner: &str, repo: &str, tag: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "node_id": "RE_test",
        "url": format!("https://api.github.com/repos/{owner}/{repo}/releases/1"),
        "html_url": format!("https://github.com/{owner}/{repo}/releases/tag/{tag}"),
        "assets_url": format!("https://api.github.com/repos/{owner}/{repo}/releases/1/assets"),
        "upload_url": format!("https://uploads.github.com/repos/{owner}/{repo}/releases/1/assets{{?name,label}}"),
        "tarball_url": null,
        "zipball_url": null,
        "tag_name": tag,
        "target_commitish": "main",
        "name": tag,
        "body": null,
        "draft": false,
        "prerelease": false,
        "created_at": "2024-01-01T00:00:00Z",
        "published_at": "2024-01-01T00:00:00Z",
        "author": mock_user("release-bot"),
        "assets": []
    })
}

/// Serve `first` with a `Link: rel="next"` header pointing at `page=2`,
/// which serves `second`. Each page must be requested exactly once.
async fn mount_two_pages(
    server: &MockServer,
    route: &str,
    query: &str,
    first: Vec<serde_json::Value>,
    second: Vec<serde_json::Value>,
) {
    let next = format!("{}{route}?{query}per_page=100&page=2", server.uri());
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", format!("<{next}>; rel=\"next\""))
                .set_body_json(first),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(second))
        .expect(1)
        .mount(server)
        .await;
}

fn error_body(message: &str) -> serde_json::Value {
    json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    })
}

/// wiremock-based GitHub mock server for testing.
///
/// This provides HTTP-level mocking for GitHub API endpoints, allowing tests
/// to verify actual HTTP requests rather than mocking at the trait level.
pub struct GitHubMockServer {
    server: MockServer,
}

impl GitHubMockServer {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get an OctocrabClient configured to use this mock server.
    pub fn client(&self) -> OctocrabClient {
        OctocrabClient::with_base_url(&self.server.uri(), "test-token").unwrap()
    }

    /// Create a repository context for building mocks.
    pub fn repo<'a>(&'a self, owner: &'a str, repo: &'a str) -> MockRepoContext<'a> {
        MockRepoContext {
            server: &self.server,
            owner,
            repo,
        }
    }

    /// Requests received so far, for asserting on request bodies.
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

// ============ Builder Pattern API ============

/// Repository context for building mocks.
///
/// Created via `GitHubMockServer::repo()`.
pub struct MockRepoContext<'a> {
    server: &'a MockServer,
    owner: &'a str,
    repo: &'a str,
}

impl<'a> MockRepoContext<'a> {
    /// Create an issue mock builder.
    pub fn issue(&self, number: u64) -> MockIssueBuilder<'_> {
        MockIssueBuilder {
            server: self.server,
            owner: self.owner,
            repo: self.repo,
            number,
        }
    }

    /// Create a comment mock builder.
    pub fn comment(&self, id: u64) -> MockCommentBuilder<'_> {
        MockCommentBuilder {
            server: self.server,
            owner: self.owner,
            repo: self.repo,
            id,
        }
    }

    /// Mount mock for GET /repos/{owner}/{repo}/issues?state=open.
    pub async fn open_issues(&self, issues: &[(u64, &[&str])]) {
        let owner = self.owner;
        let repo = self.repo;
        let body: Vec<_> = issues
            .iter()
            .map(|(number, labels)| mock_issue(owner, repo, *number, labels))
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/issues")))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(self.server)
            .await;
    }

    /// Same endpoint split over two pages linked by a `next` header.
    pub async fn open_issues_paged(&self, first: &[(u64, &[&str])], second: &[(u64, &[&str])]) {
        let owner = self.owner;
        let repo = self.repo;
        let render = |issues: &[(u64, &[&str])]| -> Vec<_> {
            issues
                .iter()
                .map(|(number, labels)| mock_issue(owner, repo, *number, labels))
                .collect()
        };
        mount_two_pages(
            self.server,
            &format!("/repos/{owner}/{repo}/issues"),
            "state=open&",
            render(first),
            render(second),
        )
        .await;
    }

    /// Mount mock for POST /repos/{owner}/{repo}/labels (201 Created).
    pub async fn create_label(&self) {
        let owner = self.owner;
        let repo = self.repo;
        Mock::given(method("POST"))
            .and(path(format!("/repos/{owner}/{repo}/labels")))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(mock_label(owner, repo, "created", "ededed")),
            )
            .mount(self.server)
            .await;
    }

    /// Mount mock for POST /repos/{owner}/{repo}/labels answering 422.
    pub async fn create_label_exists(&self) {
        let owner = self.owner;
        let repo = self.repo;
        Mock::given(method("POST"))
            .and(path(format!("/repos/{owner}/{repo}/labels")))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Validation Failed",
                "errors": [{"resource": "Label", "code": "already_exists", "field": "name"}],
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(self.server)
            .await;
    }

    /// Mount mock for GET /repos/{owner}/{repo}/releases/latest.
    pub async fn latest_release(&self, tag: &str) {
        let owner = self.owner;
        let repo = self.repo;
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/releases/latest")))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_release(owner, repo, tag)))
            .mount(self.server)
            .await;
    }

    /// Mount mock for GET /repos/{owner}/{repo}/releases/latest answering 404.
    pub async fn latest_release_not_found(&self) {
        let owner = self.owner;
        let repo = self.repo;
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/releases/latest")))
            .respond_with(ResponseTemplate::new(404).set_body_json(error_body("Not Found")))
            .mount(self.server)
            .await;
    }
}

/// Builder for mocking issue endpoints.
pub struct MockIssueBuilder<'a> {
    server: &'a MockServer,
    owner: &'a str,
    repo: &'a str,
    number: u64,
}

impl<'a> MockIssueBuilder<'a> {
    /// Mount mock for GET /repos/{owner}/{repo}/issues/{number}/comments.
    ///
    /// Comments are created one day apart starting 2024-01-02.
    pub async fn comments(self, comments: &[(u64, &str)]) {
        let owner = self.owner;
        let repo = self.repo;
        let number = self.number;
        let body: Vec<_> = comments
            .iter()
            .enumerate()
            .map(|(i, (id, text))| {
                let created_at = format!("2024-01-{:02}T00:00:00Z", i + 2);
                mock_comment(owner, repo, number, *id, text, &created_at)
            })
            .collect();
        Mock::given(method("GET"))
            .and(path(format!(
                "/repos/{owner}/{repo}/issues/{number}/comments"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(self.server)
            .await;
    }

    /// Same endpoint split over two pages linked by a `next` header.
    /// Dates continue across the page boundary.
    pub async fn comments_paged(self, first: &[(u64, &str)], second: &[(u64, &str)]) {
        let owner = self.owner;
        let repo = self.repo;
        let number = self.number;
        let render = |comments: &[(u64, &str)], offset: usize| -> Vec<_> {
            comments
                .iter()
                .enumerate()
                .map(|(i, (id, text))| {
                    let created_at = format!("2024-01-{:02}T00:00:00Z", offset + i + 2);
                    mock_comment(owner, repo, number, *id, text, &created_at)
                })
                .collect()
        };
        mount_two_pages(
            self.server,
            &format!("/repos/{owner}/{repo}/issues/{number}/comments"),
            "",
            render(first, 0),
            render(second, first.len()),
        )
        .await;
    }

    /// Mount mock for POST /repos/{owner}/{repo}/issues/{number}/comments.
    /// The created comment gets `comment_id`.
    pub async fn create_comment(self, comment_id: u64) {
        let owner = self.owner;
        let repo = self.repo;
        let number = self.number;
        Mock::given(method("POST"))
            .and(path(format!(
                "/repos/{owner}/{repo}/issues/{number}/comments"
            )))
            .respond_with(ResponseTemplate::new(201).set_body_json(mock_comment(
                owner,
                repo,
                number,
                comment_id,
                "created",
                "2024-02-01T00:00:00Z",
            )))
            .mount(self.server)
            .await;
    }

    /// Mount mock for POST /repos/{owner}/{repo}/issues/{number}/labels.
    pub async fn add_labels(self) {
        let owner = self.owner;
        let repo = self.repo;
        let number = self.number;
        Mock::given(method("POST"))
            .and(path(format!(
                "/repos/{owner}/{repo}/issues/{number}/labels"
            )))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([mock_label(owner, repo, "added", "ededed")])),
            )
            .mount(self.server)
            .await;
    }

    /// Mount mock for DELETE /repos/{owner}/{repo}/issues/{number}/labels/{label}.
    pub async fn remove_label(self, label: &str) {
        self.mount_remove_label(label, ResponseTemplate::new(200).set_body_json(json!([])))
            .await;
    }

    /// Same endpoint, answering 404 as when the label is no longer attached.
    pub async fn remove_label_not_found(self, label: &str) {
        self.mount_remove_label(
            label,
            ResponseTemplate::new(404).set_body_json(error_body("Label does not exist")),
        )
        .await;
    }

    async fn mount_remove_label(self, label: &str, response: ResponseTemplate) {
        let owner = self.owner;
        let repo = self.repo;
        let number = self.number;
        let encoded = utf8_percent_encode(label, LABEL_SEGMENT);
        Mock::given(method("DELETE"))
            .and(path(format!(
                "/repos/{owner}/{repo}/issues/{number}/labels/{encoded}"
            )))
            .respond_with(response)
            .expect(1)
            .mount(self.server)
            .await;
    }
}

/// Builder for mocking comment update endpoints.
pub struct MockCommentBuilder<'a> {
    server: &'a MockServer,
    owner: &'a str,
    repo: &'a str,
    id: u64,
}

impl<'a> MockCommentBuilder<'a> {
    /// Mount mock for PATCH /repos/{owner}/{repo}/issues/comments/{id}
    /// that only matches the expected new body.
    pub async fn update(self, expected_body: &str) {
        let owner = self.owner;
        let repo = self.repo;
        let id = self.id;
        Mock::given(method("PATCH"))
            .and(path(format!("/repos/{owner}/{repo}/issues/comments/{id}")))
            .and(body_partial_json(json!({ "body": expected_body })))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_comment(
                owner,
                repo,
                1,
                id,
                expected_body,
                "2024-01-02T00:00:00Z",
            )))
            .expect(1)
            .mount(self.server)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::github::{
        CommentClient, IssueClient, LabelClient, ReleaseClient, is_not_found, is_unprocessable,
    };
    use crate::shared::config::Config;
    use crate::sla::ledger::CommentLedger;
    use crate::sla::models::RepoRef;
    use crate::testing::factories::{date, issue_with, labels, utc};

    fn repo() -> RepoRef {
        RepoRef::new("owner", "repo")
    }

    #[tokio::test]
    async fn list_open_issues_converts_labels_and_repo() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo")
            .open_issues(&[(1, &["SEV-1", "mobile"]), (2, &[])])
            .await;

        let issues = mock.client().list_open_issues(&repo()).await.unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].number, 1);
        assert_eq!(issues[0].repo, repo());
        assert!(issues[0].is_open());
        assert!(issues[0].has_label("SEV-1"));
        assert!(!issues[0].is_pull_request);
        assert_eq!(issues[0].created_at, utc("2024-01-01T00:00:00Z"));
        assert!(issues[1].labels.is_empty());
    }

    #[tokio::test]
    async fn list_open_issues_follows_next_page() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo")
            .open_issues_paged(&[(1, &["SEV-1"]), (2, &[])], &[(3, &["SEV-2"])])
            .await;

        let issues = mock.client().list_open_issues(&repo()).await.unwrap();

        let numbers: Vec<u64> = issues.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(issues[2].labels[0].name, "SEV-2");
    }

    #[tokio::test]
    async fn resolution_record_on_second_comment_page_is_found() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo")
            .issue(1)
            .comments_paged(
                &[(10, "triaged"), (11, "~~Resolution Date: 2024-01-21~~")],
                &[(12, "Resolution Date: 2024-02-15"), (13, "looking into it")],
            )
            .await;
        let client = mock.client();
        let config = Config::default();
        let severity = config.severities.config_for("SEV-1").unwrap();

        let lookup = CommentLedger::new(&client)
            .get_resolution_date(&issue_with(|i| i.labels = labels(&["SEV-1"])), severity)
            .await
            .unwrap();

        assert_eq!(lookup.resolution_date, date("2024-02-15"));
        assert_eq!(
            lookup.existing_comment.as_deref(),
            Some("https://github.com/owner/repo/issues/1#issuecomment-12")
        );
    }

    #[tokio::test]
    async fn list_comments_maps_fields() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo")
            .issue(1)
            .comments(&[(10, "hello"), (11, "Resolution Date: 2024-01-21")])
            .await;

        let comments = mock
            .client()
            .list_comments(&issue_with(|i| i.number = 1))
            .await
            .unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].id, 11);
        assert_eq!(comments[1].body, "Resolution Date: 2024-01-21");
        assert_eq!(comments[1].created_at, utc("2024-01-03T00:00:00Z"));
        assert_eq!(
            comments[1].html_url,
            "https://github.com/owner/repo/issues/1#issuecomment-11"
        );
    }

    #[tokio::test]
    async fn create_comment_returns_url() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo").issue(1).create_comment(42).await;

        let comment = mock
            .client()
            .create_comment(&issue_with(|i| i.number = 1), "Resolution Date: 2024-01-21")
            .await
            .unwrap();

        assert_eq!(comment.id, 42);
        assert!(comment.html_url.ends_with("#issuecomment-42"));
    }

    #[tokio::test]
    async fn update_comment_sends_new_body() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo")
            .comment(10)
            .update("~~Resolution Date: 2024-01-21~~")
            .await;

        mock.client()
            .update_comment(&repo(), 10, "~~Resolution Date: 2024-01-21~~")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn remove_label_encodes_the_name() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo")
            .issue(1)
            .remove_label("Fix timeline: <1 week")
            .await;

        mock.client()
            .remove_label(&issue_with(|i| i.number = 1), "Fix timeline: <1 week")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn remove_missing_label_is_not_found() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo")
            .issue(1)
            .remove_label_not_found("Fix timeline: Overdue")
            .await;

        let err = mock
            .client()
            .remove_label(&issue_with(|i| i.number = 1), "Fix timeline: Overdue")
            .await
            .unwrap_err();

        assert!(is_not_found(&err));
    }

    #[tokio::test]
    async fn add_labels_succeeds() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo").issue(1).add_labels().await;

        mock.client()
            .add_labels(&issue_with(|i| i.number = 1), &["Released".to_string()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_existing_label_is_unprocessable() {
        let mock = GitHubMockServer::start().await;
        mock.repo("owner", "repo").create_label_exists().await;

        let err = mock
            .client()
            .create_label(&repo(), "Fix timeline: 3 weeks", "d93f0b")
            .await
            .unwrap_err();

        assert!(is_unprocessable(&err));
        assert!(!is_not_found(&err));
    }

    #[tokio::test]
    async fn latest_release_tag_is_returned() {
        let mock = GitHubMockServer::start().await;
        mock.repo("MetaMask", "metamask-mobile")
            .latest_release("v7.12.0")
            .await;

        let tag = mock
            .client()
            .latest_release_tag("MetaMask", "metamask-mobile")
            .await
            .unwrap();

        assert_eq!(tag, "v7.12.0");
    }

    #[tokio::test]
    async fn missing_release_is_not_found() {
        let mock = GitHubMockServer::start().await;
        mock.repo("MetaMask", "metamask-extension")
            .latest_release_not_found()
            .await;

        let err = mock
            .client()
            .latest_release_tag("MetaMask", "metamask-extension")
            .await
            .unwrap_err();

        assert!(is_not_found(&err));
    }
}
