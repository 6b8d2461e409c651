//! Proposal record fetching from the GitHub issue tracker.

use async_trait::async_trait;
use msc_common::{
    GitHubClient, GitHubConfig, Issue, IssueQuery, IssueState, ProposalRecord, RepositoryId, Result,
    Stage, MAX_PER_PAGE,
};
use msc_config::{GitHubSettings, DEFAULT_LABEL, DEFAULT_REPOSITORY};
use tracing::{info, instrument};

/// Source of proposal records.
#[async_trait]
pub trait ProposalSource: Send + Sync {
    /// Fetch every proposal with its current stage
    async fn fetch_records(&self) -> Result<Vec<ProposalRecord>>;
}

/// How a [`RecordFetcher`] reaches the API
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Personal access token; a client with default settings is built from it
    Token(String),
    /// Pre-configured client
    Client(GitHubClient),
}

impl From<GitHubClient> for Credentials {
    fn from(client: GitHubClient) -> Self {
        Credentials::Client(client)
    }
}

/// Fetches the labelled proposal issues of one repository.
#[derive(Debug, Clone)]
pub struct RecordFetcher {
    client: GitHubClient,
    repository: RepositoryId,
    label: String,
    per_page: u8,
}

impl RecordFetcher {
    /// Fetcher for the default proposals repository.
    ///
    /// Fails with an authentication error when given an empty token.
    pub fn new(credentials: impl Into<Credentials>) -> Result<Self> {
        let client = match credentials.into() {
            Credentials::Token(token) => GitHubClient::with_token(token)?,
            Credentials::Client(client) => client,
        };

        Ok(Self {
            client,
            repository: DEFAULT_REPOSITORY.parse()?,
            label: DEFAULT_LABEL.to_string(),
            per_page: MAX_PER_PAGE,
        })
    }

    /// Fetcher configured from the `[github]` settings
    pub fn from_settings(settings: &GitHubSettings) -> Result<Self> {
        let client = GitHubClient::new(GitHubConfig::from(settings))?;
        Ok(Self::new(client)?
            .with_repository(settings.repository.parse()?)
            .with_label(settings.label.clone())
            .with_per_page(settings.per_page))
    }

    pub fn with_repository(mut self, repository: RepositoryId) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn repository(&self) -> &RepositoryId {
        &self.repository
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl From<String> for Credentials {
    fn from(token: String) -> Self {
        Credentials::Token(token)
    }
}

impl From<&str> for Credentials {
    fn from(token: &str) -> Self {
        Credentials::Token(token.to_string())
    }
}

#[async_trait]
impl ProposalSource for RecordFetcher {
    #[instrument(skip(self), fields(repository = %self.repository, label = %self.label))]
    async fn fetch_records(&self) -> Result<Vec<ProposalRecord>> {
        let query = IssueQuery::labelled(self.label.clone()).with_per_page(self.per_page);
        let issues = self.client.list_issues(&self.repository, &query).await?;

        let records: Vec<ProposalRecord> = issues.iter().map(to_record).collect();
        info!(count = records.len(), "Fetched proposal records");
        Ok(records)
    }
}

fn to_record(issue: &Issue) -> ProposalRecord {
    ProposalRecord::new(issue.number, issue.title.clone(), issue.created_at, classify_stage(issue))
}

/// Labels that mark a closed proposal as not accepted
const REJECTION_LABELS: [&str; 4] = ["rejected", "abandoned", "obsolete", "disposition-close"];

/// Stage of a proposal from its current state and labels.
pub fn classify_stage(issue: &Issue) -> Stage {
    match issue.state {
        IssueState::Open | IssueState::All => {
            if issue.has_label("final-comment-period") {
                Stage::Fcp
            } else if issue.has_label("finished-final-comment-period")
                && issue.has_label("disposition-postpone")
            {
                Stage::Postponed
            } else {
                Stage::New
            }
        }
        IssueState::Closed => {
            if REJECTION_LABELS.iter().any(|label| issue.has_label(label)) {
                Stage::Closed
            } else if issue.has_label("merged") {
                Stage::Merged
            } else {
                match &issue.pull_request {
                    Some(pr) if pr.merged_at.is_some() => Stage::Merged,
                    Some(_) => Stage::Closed,
                    None => Stage::Merged,
                }
            }
        }
    }
}
