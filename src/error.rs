//! Error types for merge-gate

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`], used by callers to decide on retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A forge call failed; the caller may retry with backoff
    Transport,
    /// Provenance or eligibility rules rejected the PR; retrying without a
    /// state change reproduces the same failure
    Policy,
    /// The forge refused or failed the merge call itself
    MergeExecution,
    /// Local setup problem (configuration, credentials)
    Setup,
}

/// Errors produced by merge-gate
#[derive(Debug, Error)]
pub enum Error {
    /// A required fetch failed while evaluating a PR
    #[error("failed to fetch {what}: {source}")]
    Fetch {
        /// What was being fetched (e.g. "labels", "operation log")
        what: &'static str,
        /// Underlying transport error
        #[source]
        source: Box<Error>,
    },

    /// Generic platform failure (used by mocks and adapters)
    #[error("platform error: {0}")]
    Platform(String),

    /// GitHub API returned an error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// GitLab API returned an error
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// octocrab client error
    #[error("GitHub client error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// One or more gating labels lack a valid provenance record
    #[error("{}", crate::merge::render_not_ready(.0))]
    LabelsNotReady(Vec<String>),

    /// The PR does not satisfy the repository's merge policy
    #[error("PR is not eligible to merge: {}", .0.join("; "))]
    NotEligible(Vec<String>),

    /// The forge did not merge the PR
    #[error("failed to merge pull request: {0}")]
    MergeFailed(String),

    /// Configuration could not be read or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// No policy covers the repository
    #[error("no policy configured for {owner}/{repo}")]
    NoPolicy {
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
    },

    /// Token could not be resolved
    #[error("authentication error: {0}")]
    Auth(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify the error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch { .. }
            | Self::Platform(_)
            | Self::GitHubApi(_)
            | Self::GitLabApi(_)
            | Self::Http(_)
            | Self::Octocrab(_) => ErrorKind::Transport,
            Self::LabelsNotReady(_) | Self::NotEligible(_) => ErrorKind::Policy,
            Self::MergeFailed(_) => ErrorKind::MergeExecution,
            Self::Config(_) | Self::NoPolicy { .. } | Self::Auth(_) | Self::Internal(_) => {
                ErrorKind::Setup
            }
        }
    }

    /// Whether an automatic retry could plausibly succeed
    ///
    /// Policy failures are never retryable. Merge failures are opaque, so
    /// the decision is left to the caller and this returns `false`.
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport)
    }

    /// Wrap a transport error raised while fetching `what`
    pub fn fetch(what: &'static str, source: Self) -> Self {
        Self::Fetch {
            what,
            source: Box::new(source),
        }
    }
}
