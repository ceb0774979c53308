//! Core types for merge-gate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    #[default]
    GitHub,
    /// GitLab or self-hosted GitLab
    GitLab,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Custom host (None for github.com/gitlab.com)
    pub host: Option<String>,
}

/// Identifies one pull request / merge request on a forge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrRef {
    /// Repository owner (user, organization or group path)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// PR/MR number
    pub number: u64,
}

impl PrRef {
    /// Create a new PR reference
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Parse `owner/repo` plus a number. Owner may contain `/` (GitLab groups).
    pub fn parse(slug: &str, number: u64) -> Option<Self> {
        let slug = slug.trim().trim_end_matches('/');
        let (owner, repo) = slug.rsplit_once('/')?;
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some(Self::new(owner, repo, number))
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for PrRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Description prefix of an operation log entry recording a label addition
pub const ADD_LABEL_ACTION: &str = "add label";

/// Description prefix of an operation log entry recording a label removal
pub const REMOVE_LABEL_ACTION: &str = "remove label";

/// Kind of label mutation recorded in the operation log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAction {
    /// Labels were attached
    Added,
    /// Labels were detached
    Removed,
}

impl LabelAction {
    /// Description prefix for this action
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => ADD_LABEL_ACTION,
            Self::Removed => REMOVE_LABEL_ACTION,
        }
    }
}

/// One immutable record of a label mutation on a PR
///
/// Label names are kept as forge-reported values; `description` is only
/// for display and is never parsed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLogEntry {
    /// Login of the actor that performed the mutation (empty when unknown)
    pub actor: String,
    /// Whether labels were added or removed
    pub action: LabelAction,
    /// Names of the labels the mutation touched
    pub labels: Vec<String>,
    /// Textual description, e.g. `add label lgtm, approved`
    pub description: String,
    /// When the mutation happened
    pub created_at: DateTime<Utc>,
}

impl OperationLogEntry {
    /// Build an entry recording `action` on `labels`
    pub fn new(
        actor: &str,
        action: LabelAction,
        labels: &[&str],
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor: actor.to_string(),
            action,
            labels: labels.iter().map(ToString::to_string).collect(),
            description: format!("{} {}", action.as_str(), labels.join(", ")),
            created_at,
        }
    }

    /// Build the entry a forge would record for adding `labels`
    pub fn label_added(actor: &str, labels: &[&str], created_at: DateTime<Utc>) -> Self {
        Self::new(actor, LabelAction::Added, labels, created_at)
    }

    /// Build the entry a forge would record for removing `labels`
    pub fn label_removed(actor: &str, labels: &[&str], created_at: DateTime<Utc>) -> Self {
        Self::new(actor, LabelAction::Removed, labels, created_at)
    }

    /// Labels named by this entry if it records an addition
    pub fn added_labels(&self) -> Option<impl Iterator<Item = &str>> {
        (self.action == LabelAction::Added).then(|| self.labels.iter().map(String::as_str))
    }

    /// Whether this entry records an addition of `label`
    pub fn adds_label(&self, label: &str) -> bool {
        self.added_labels()
            .is_some_and(|mut labels| labels.any(|l| l == label))
    }
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
    /// Any other method name, passed through to the forge as-is
    Other(String),
}

impl MergeMethod {
    /// Parse a method name. Squash aliases normalize to [`MergeMethod::Squash`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "merge" => Self::Merge,
            "squash" | "squash-merge" => Self::Squash,
            "rebase" => Self::Rebase,
            _ => Self::Other(name.trim().to_string()),
        }
    }

    /// Method name as sent to the forge
    pub fn as_str(&self) -> &str {
        match self {
            Self::Merge => "merge",
            Self::Squash => "squash",
            Self::Rebase => "rebase",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comment posted on a PR, as delivered by the event layer
#[derive(Debug, Clone)]
pub struct CommentEvent {
    /// The PR the comment was posted on
    pub pr: PrRef,
    /// Login of the PR author
    pub author: String,
    /// Login of the commenter
    pub commenter: String,
    /// Comment body
    pub body: String,
}
