//! Platform services for GitHub and GitLab
//!
//! Provides a unified interface for the label, comment, permission and merge
//! operations the merge gate needs from a forge.

mod factory;
mod github;
mod gitlab;

pub use factory::create_platform_service;
pub use github::GitHubService;
pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{MergeMethod, MergeResult, OperationLogEntry, PlatformConfig, PrRef};
use async_trait::async_trait;

/// Platform service trait for forge operations
///
/// Every method returns `Err` for transport/infrastructure failures only.
/// Domain-level negatives are values, e.g. `check_permission` returning
/// `Ok(false)` means "checked and denied".
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Labels currently attached to a PR
    async fn get_labels(&self, pr: &PrRef) -> Result<Vec<String>>;

    /// Label operation history of a PR, oldest first
    async fn list_operation_logs(&self, pr: &PrRef) -> Result<Vec<OperationLogEntry>>;

    /// Attach labels to a PR
    async fn add_labels(&self, pr: &PrRef, labels: &[String]) -> Result<()>;

    /// Detach labels from a PR
    async fn remove_labels(&self, pr: &PrRef, labels: &[String]) -> Result<()>;

    /// Whether `user` may operate gating labels in `owner/repo`
    async fn check_permission(&self, owner: &str, repo: &str, user: &str) -> Result<bool>;

    /// Merge a PR with the specified method
    async fn merge_pr(&self, pr: &PrRef, method: &MergeMethod) -> Result<MergeResult>;

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr: &PrRef, body: &str) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
