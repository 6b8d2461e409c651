//! GitHub REST API client with rate limiting and opt-in retries
//!
//! Only the issue listing endpoint is wrapped; proposals are issues and pull
//! requests carrying a label, and the issues endpoint returns both.

use crate::error::{MscError, Result};
use chrono::{DateTime, Utc};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroU32, str::FromStr, sync::Arc, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, info, instrument, warn};

/// Default public API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page size the issues endpoint accepts
pub const MAX_PER_PAGE: u8 = 100;

/// Configuration for the GitHub API client
#[derive(Clone)]
pub struct GitHubConfig {
    /// Base URL of the REST API
    pub api_url: String,
    /// Personal access token; only needs read access to public repositories
    pub token: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Rate limit: requests per second (default: 10)
    pub rate_limit_per_sec: u32,
    /// Retry attempts for retryable failures (default: 0, no retries)
    pub max_retries: usize,
    /// User-Agent header, required by GitHub
    pub user_agent: String,
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("rate_limit_per_sec", &self.rate_limit_per_sec)
            .field("max_retries", &self.max_retries)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            timeout_secs: 30,
            rate_limit_per_sec: 10,
            max_retries: 0,
            user_agent: concat!("msc-chart/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GitHubConfig {
    /// Create a new configuration with the given token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    /// Set the API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rate_limit_per_sec: u32) -> Self {
        self.rate_limit_per_sec = rate_limit_per_sec;
        self
    }

    /// Set the maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// `owner/name` coordinates of a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryId {
    /// User or organisation
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepositoryId {
    /// Creates repository coordinates
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepositoryId {
    type Err = MscError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(MscError::validation_field(
                format!("Repository must be 'owner/name', got '{s}'"),
                "repository",
            )),
        }
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Issue state filter and value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Open issue or pull request
    Open,
    /// Closed (or merged) issue or pull request
    Closed,
    /// Filter value matching both
    All,
}

impl IssueState {
    fn as_query(self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }
}

/// Label attached to an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,
}

/// Pull request marker on an issue
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Merge timestamp, absent when the pull request was not merged
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

/// Issue as returned by `GET /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Title
    pub title: String,
    /// Open or closed
    pub state: IssueState,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Close time
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Labels currently attached
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Present when the issue is a pull request
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
}

impl Issue {
    /// Whether a label with the given name is attached
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// Whether this issue is a pull request
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Query parameters for listing issues
#[derive(Debug, Clone)]
pub struct IssueQuery {
    /// State filter
    pub state: IssueState,
    /// Comma separated label filter
    pub labels: Vec<String>,
    /// Page size, 1-100
    pub per_page: u8,
}

impl IssueQuery {
    /// All issues carrying `label`, oldest first
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            state: IssueState::All,
            labels: vec![label.into()],
            per_page: MAX_PER_PAGE,
        }
    }

    /// Set the page size
    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }
}

/// GitHub API client with connection pooling and rate limiting
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl GitHubClient {
    /// Create a new GitHub client with the given configuration
    pub fn new(config: GitHubConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(MscError::auth("No GitHub token configured"));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| MscError::transient_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| MscError::config("Rate limit must be greater than 0"))?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Create a new client with default configuration
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        Self::new(GitHubConfig::new(token))
    }

    /// Client configuration
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Map a non-success response onto the error taxonomy
    fn classify_failure(response: &Response) -> MscError {
        let status = response.status();
        let rate_limited = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");

        match status {
            StatusCode::UNAUTHORIZED => {
                MscError::auth("GitHub rejected the token (bad or expired credentials)")
            }
            StatusCode::FORBIDDEN if rate_limited => MscError::transient_with_status(
                "GitHub API rate limit exceeded",
                status.as_u16(),
            ),
            StatusCode::FORBIDDEN => {
                MscError::auth("GitHub token lacks access to this resource")
            }
            StatusCode::TOO_MANY_REQUESTS => MscError::transient_with_status(
                "GitHub API secondary rate limit exceeded",
                status.as_u16(),
            ),
            s if s.is_server_error() => MscError::transient_with_status(
                format!("GitHub API returned server error: {s}"),
                s.as_u16(),
            ),
            s => MscError::transient_with_status(
                format!("GitHub API returned client error: {s}"),
                s.as_u16(),
            ),
        }
    }

    /// Make an authenticated GET request, retrying only retryable failures
    #[instrument(skip(self, path, params), fields(path = %path))]
    async fn make_request(&self, path: &str, params: &[(&str, String)]) -> Result<Response> {
        let url = self.build_url(path);
        debug!("Making request to: {}", url);

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        RetryIf::start(
            retry_strategy,
            || async {
                self.rate_limiter.until_ready().await;

                let response = match self
                    .client
                    .get(&url)
                    .bearer_auth(&self.config.token)
                    .query(params)
                    .send()
                    .await
                {
                    Ok(response) => response,
                    Err(e) => {
                        warn!("Request failed: {}", e);
                        return Err(MscError::from(e));
                    }
                };

                if response.status().is_success() {
                    debug!("Request successful: {}", response.status());
                    Ok(response)
                } else {
                    let error = Self::classify_failure(&response);
                    warn!(status = %response.status(), "Request failed: {}", error);
                    Err(error)
                }
            },
            |e: &MscError| e.is_retryable(),
        )
        .await
    }

    /// Fetch one page of issues
    #[instrument(skip(self, repository, query), fields(repository = %repository))]
    pub async fn list_issues_page(
        &self,
        repository: &RepositoryId,
        query: &IssueQuery,
        page: u32,
    ) -> Result<Vec<Issue>> {
        let path = format!("repos/{}/{}/issues", repository.owner, repository.name);
        let mut params = vec![
            ("state", query.state.as_query().to_string()),
            ("sort", "created".to_string()),
            ("direction", "asc".to_string()),
            ("per_page", query.per_page.to_string()),
            ("page", page.to_string()),
        ];
        if !query.labels.is_empty() {
            params.push(("labels", query.labels.join(",")));
        }

        let response = self.make_request(&path, &params).await?;
        let issues: Vec<Issue> = response.json().await?;
        debug!(count = issues.len(), "Fetched issue page");
        Ok(issues)
    }

    /// Fetch every page of issues matching `query`.
    ///
    /// Stops at the first page shorter than `per_page`.
    #[instrument(skip(self, repository, query), fields(repository = %repository))]
    pub async fn list_issues(&self, repository: &RepositoryId, query: &IssueQuery) -> Result<Vec<Issue>> {
        if query.per_page == 0 || query.per_page > MAX_PER_PAGE {
            return Err(MscError::validation_field(
                format!("per_page must be between 1 and {MAX_PER_PAGE}"),
                "per_page",
            ));
        }

        let mut issues = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.list_issues_page(repository, query, page).await?;
            let batch_len = batch.len();
            issues.extend(batch);
            info!(page, total = issues.len(), "Fetched proposals page");

            if batch_len < usize::from(query.per_page) {
                break;
            }
            page += 1;
        }

        Ok(issues)
    }
}
