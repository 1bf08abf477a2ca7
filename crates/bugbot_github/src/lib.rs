use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("bugbot/", env!("CARGO_PKG_VERSION"));

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: std::time::Duration = std::time::Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub issue create failed: {status} {body}")]
    Status { status: reqwest::StatusCode, body: String },
}

impl GithubError {
    /// Transient errors are worth retrying, everything else (auth failures,
    /// validation errors, ...) will just fail again.
    fn is_transient(&self) -> bool {
        match self {
            GithubError::Request(err) => err.is_timeout() || err.is_connect(),
            GithubError::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// The fields of the create-issue response we actually care about.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub html_url: String,
    pub number: u64,
}

#[derive(Debug)]
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
}

impl GithubClient {
    pub fn new(token: String, owner: String, repo: String) -> Self {
        Self { http: reqwest::Client::new(), token, owner, repo }
    }

    fn issues_url(&self) -> String {
        format!("{API_BASE}/repos/{}/{}/issues", self.owner, self.repo)
    }

    /// Create an issue, retrying transient failures with exponential backoff.
    #[tracing::instrument(skip_all, fields(issue.title = %issue.title))]
    pub async fn create_issue(&self, issue: &NewIssue) -> Result<Issue, GithubError> {
        let mut attempt = 1;
        let mut delay = RETRY_BASE_DELAY;
        loop {
            match self.try_create_issue(issue).await {
                Err(err) if attempt < MAX_ATTEMPTS && err.is_transient() => {
                    tracing::warn!(
                        error.message = %err,
                        attempt,
                        "GitHub issue creation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_create_issue(&self, issue: &NewIssue) -> Result<Issue, GithubError> {
        let response = self
            .http
            .post(self.issues_url())
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(issue)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Status { status, body });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_url_targets_configured_repo() {
        let client = GithubClient::new("t".to_string(), "acme".to_string(), "webapp".to_string());
        assert_eq!(client.issues_url(), "https://api.github.com/repos/acme/webapp/issues");
    }

    #[test]
    fn new_issue_serializes_to_github_shape() {
        let issue = NewIssue {
            title: "[Bug] Login crashes".to_string(),
            body: "body".to_string(),
            labels: vec!["bug".to_string()],
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["title"], "[Bug] Login crashes");
        assert_eq!(json["body"], "body");
        assert_eq!(json["labels"], serde_json::json!(["bug"]));
    }

    #[test]
    fn server_errors_are_transient_client_errors_are_not() {
        let transient = GithubError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        let rate_limited = GithubError::Status {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        let permanent = GithubError::Status {
            status: reqwest::StatusCode::UNPROCESSABLE_ENTITY,
            body: "Validation Failed".to_string(),
        };
        assert!(transient.is_transient());
        assert!(rate_limited.is_transient());
        assert!(!permanent.is_transient());
    }
}
