//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    MergeMethod, MergeResult, OperationLogEntry, Platform, PlatformConfig, PrRef,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Page size for raw REST listing
const PER_PAGE: usize = 100;

/// Collaborator permission levels allowed to operate gating labels
const WRITE_PERMISSIONS: &[&str] = &["admin", "maintain", "write"];

/// Issue event as returned by `GET /repos/{owner}/{repo}/issues/{number}/events`
#[derive(Deserialize)]
struct IssueEvent {
    event: String,
    actor: Option<Actor>,
    label: Option<EventLabel>,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct Actor {
    login: String,
}

#[derive(Deserialize)]
struct EventLabel {
    name: String,
}

impl IssueEvent {
    /// Convert labeled/unlabeled events into operation log entries
    fn into_log_entry(self) -> Option<OperationLogEntry> {
        let label = self.label?.name;
        let actor = self.actor.map(|a| a.login).unwrap_or_default();
        match self.event.as_str() {
            "labeled" => Some(OperationLogEntry::label_added(
                &actor,
                &[&label],
                self.created_at,
            )),
            "unlabeled" => Some(OperationLogEntry::label_removed(
                &actor,
                &[&label],
                self.created_at,
            )),
            _ => None,
        }
    }
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests (events, permissions)
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API base URL for raw requests
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_base = if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            base_url
        } else {
            "https://api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("merge-gate")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                platform: Platform::GitHub,
                host,
            },
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_labels(&self, pr: &PrRef) -> Result<Vec<String>> {
        debug!(%pr, "listing labels");
        let page = self
            .client
            .issues(&pr.owner, &pr.repo)
            .list_labels_for_issue(pr.number)
            .per_page(100)
            .send()
            .await?;
        let labels = self.client.all_pages(page).await?;

        let result: Vec<String> = labels.into_iter().map(|l| l.name).collect();
        debug!(%pr, count = result.len(), "listed labels");
        Ok(result)
    }

    async fn list_operation_logs(&self, pr: &PrRef) -> Result<Vec<OperationLogEntry>> {
        debug!(%pr, "listing issue events");
        let url = format!(
            "{}/repos/{}/{}/issues/{}/events",
            self.api_base, pr.owner, pr.repo, pr.number
        );

        let mut entries = Vec::new();
        for page in 1.. {
            let events: Vec<IssueEvent> = self
                .get(&url)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to fetch issue events: {e}")))?
                .error_for_status()
                .map_err(|e| Error::GitHubApi(e.to_string()))?
                .json()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to parse issue events: {e}")))?;

            let last_page = events.len() < PER_PAGE;
            entries.extend(events.into_iter().filter_map(IssueEvent::into_log_entry));
            if last_page {
                break;
            }
        }

        debug!(%pr, count = entries.len(), "listed label events");
        Ok(entries)
    }

    async fn add_labels(&self, pr: &PrRef, labels: &[String]) -> Result<()> {
        debug!(%pr, ?labels, "adding labels");
        self.client
            .issues(&pr.owner, &pr.repo)
            .add_labels(pr.number, labels)
            .await?;
        Ok(())
    }

    async fn remove_labels(&self, pr: &PrRef, labels: &[String]) -> Result<()> {
        debug!(%pr, ?labels, "removing labels");
        let issues = self.client.issues(&pr.owner, &pr.repo);
        for label in labels {
            issues.remove_label(pr.number, label).await?;
        }
        Ok(())
    }

    async fn check_permission(&self, owner: &str, repo: &str, user: &str) -> Result<bool> {
        #[derive(Deserialize)]
        struct PermissionResponse {
            permission: String,
        }

        debug!(owner, repo, user, "checking collaborator permission");
        let url = format!(
            "{}/repos/{owner}/{repo}/collaborators/{user}/permission",
            self.api_base
        );

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch permission: {e}")))?;

        // Not a collaborator at all
        if response.status() == StatusCode::NOT_FOUND {
            debug!(user, "user is not a collaborator");
            return Ok(false);
        }

        let permission: PermissionResponse = response
            .error_for_status()
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse permission: {e}")))?;

        let allowed = WRITE_PERMISSIONS.contains(&permission.permission.as_str());
        debug!(user, permission = %permission.permission, allowed, "checked permission");
        Ok(allowed)
    }

    async fn merge_pr(&self, pr: &PrRef, method: &MergeMethod) -> Result<MergeResult> {
        debug!(%pr, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
            MergeMethod::Other(name) => {
                return Err(Error::GitHubApi(format!(
                    "merge method '{name}' is not supported by GitHub"
                )));
            }
        };

        let result = self
            .client
            .pulls(&pr.owner, &pr.repo)
            .merge(pr.number)
            .method(octocrab_method)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            %pr,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn create_pr_comment(&self, pr: &PrRef, body: &str) -> Result<()> {
        debug!(%pr, "creating PR comment");
        self.client
            .issues(&pr.owner, &pr.repo)
            .create_comment(pr.number, body)
            .await?;
        debug!(%pr, "created PR comment");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
