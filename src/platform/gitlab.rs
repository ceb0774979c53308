//! GitLab platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    MergeMethod, MergeResult, OperationLogEntry, Platform, PlatformConfig, PrRef,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size for listing endpoints
const PER_PAGE: usize = 100;

/// Developer access level; the lowest level that may push
const DEVELOPER_ACCESS: u32 = 30;

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    api_base: String,
    config: PlatformConfig,
}

#[derive(Deserialize)]
struct MergeRequest {
    #[serde(default)]
    labels: Vec<String>,
}

#[derive(Deserialize)]
struct LabelEvent {
    action: String,
    user: Option<EventUser>,
    label: Option<EventLabel>,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct EventUser {
    username: String,
}

#[derive(Deserialize)]
struct EventLabel {
    name: String,
}

impl LabelEvent {
    fn into_log_entry(self) -> Option<OperationLogEntry> {
        // Deleted labels come back as null
        let label = self.label?.name;
        let actor = self.user.map(|u| u.username).unwrap_or_default();
        match self.action.as_str() {
            "add" => Some(OperationLogEntry::label_added(
                &actor,
                &[&label],
                self.created_at,
            )),
            "remove" => Some(OperationLogEntry::label_removed(
                &actor,
                &[&label],
                self.created_at,
            )),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct User {
    id: u64,
}

#[derive(Deserialize)]
struct Member {
    access_level: u32,
}

/// Merge response
#[derive(Deserialize)]
struct MergeResponse {
    state: String,
    merge_commit_sha: Option<String>,
    squash_commit_sha: Option<String>,
}

impl GitLabService {
    /// Create a new GitLab service
    pub fn new(token: String, host: Option<String>) -> Result<Self> {
        let api_host = host.clone().unwrap_or_else(|| "gitlab.com".to_string());
        let config_host = host.filter(|h| h != "gitlab.com");
        Self::build(token, format!("https://{api_host}"), config_host)
    }

    /// Create a service against an explicit base URL such as `http://127.0.0.1:1234`
    pub fn with_base_url(token: String, base_url: &str) -> Result<Self> {
        Self::build(token, base_url.trim_end_matches('/').to_string(), None)
    }

    fn build(token: String, base_url: String, host: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            api_base: format!("{base_url}/api/v4"),
            config: PlatformConfig {
                platform: Platform::GitLab,
                host,
            },
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn encoded_project(owner: &str, repo: &str) -> String {
        urlencoding::encode(&format!("{owner}/{repo}")).into_owned()
    }

    fn mr_url(&self, pr: &PrRef, suffix: &str) -> String {
        self.api_url(&format!(
            "/projects/{}/merge_requests/{}{suffix}",
            Self::encoded_project(&pr.owner, &pr.repo),
            pr.number
        ))
    }

    async fn update_labels(&self, pr: &PrRef, field: &str, labels: &[String]) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), labels.join(",").into());

        self.client
            .put(self.mr_url(pr, ""))
            .header("PRIVATE-TOKEN", &self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl PlatformService for GitLabService {
    async fn get_labels(&self, pr: &PrRef) -> Result<Vec<String>> {
        debug!(%pr, "listing MR labels");
        let mr: MergeRequest = self
            .client
            .get(self.mr_url(pr, ""))
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(%pr, count = mr.labels.len(), "listed MR labels");
        Ok(mr.labels)
    }

    async fn list_operation_logs(&self, pr: &PrRef) -> Result<Vec<OperationLogEntry>> {
        debug!(%pr, "listing label events");
        let url = self.mr_url(pr, "/resource_label_events");

        let mut entries = Vec::new();
        for page in 1.. {
            let events: Vec<LabelEvent> = self
                .client
                .get(&url)
                .header("PRIVATE-TOKEN", &self.token)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?
                .error_for_status()
                .map_err(|e| Error::GitLabApi(e.to_string()))?
                .json()
                .await?;

            let last_page = events.len() < PER_PAGE;
            entries.extend(events.into_iter().filter_map(LabelEvent::into_log_entry));
            if last_page {
                break;
            }
        }

        debug!(%pr, count = entries.len(), "listed label events");
        Ok(entries)
    }

    async fn add_labels(&self, pr: &PrRef, labels: &[String]) -> Result<()> {
        debug!(%pr, ?labels, "adding MR labels");
        self.update_labels(pr, "add_labels", labels).await
    }

    async fn remove_labels(&self, pr: &PrRef, labels: &[String]) -> Result<()> {
        debug!(%pr, ?labels, "removing MR labels");
        self.update_labels(pr, "remove_labels", labels).await
    }

    async fn check_permission(&self, owner: &str, repo: &str, user: &str) -> Result<bool> {
        debug!(owner, repo, user, "checking member access level");
        let users: Vec<User> = self
            .client
            .get(self.api_url("/users"))
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("username", user)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        let Some(found) = users.first() else {
            debug!(user, "unknown user");
            return Ok(false);
        };

        let url = self.api_url(&format!(
            "/projects/{}/members/all/{}",
            Self::encoded_project(owner, repo),
            found.id
        ));
        let response = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(user, "user is not a project member");
            return Ok(false);
        }

        let member: Member = response
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        let allowed = member.access_level >= DEVELOPER_ACCESS;
        debug!(user, access_level = member.access_level, allowed, "checked access level");
        Ok(allowed)
    }

    async fn merge_pr(&self, pr: &PrRef, method: &MergeMethod) -> Result<MergeResult> {
        debug!(%pr, %method, "merging MR");

        // Rebase vs merge commit is a project setting on GitLab; only squash is per request
        let body = match method {
            MergeMethod::Squash => serde_json::json!({ "squash": true }),
            MergeMethod::Merge | MergeMethod::Rebase => serde_json::json!({}),
            MergeMethod::Other(name) => {
                return Err(Error::GitLabApi(format!(
                    "merge method '{name}' is not supported by GitLab"
                )));
            }
        };

        let response: MergeResponse = self
            .client
            .put(self.mr_url(pr, "/merge"))
            .header("PRIVATE-TOKEN", &self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(format!("Merge failed: {e}")))?
            .json()
            .await?;

        let merged = response.state == "merged";
        let merge_result = MergeResult {
            merged,
            sha: response.merge_commit_sha.or(response.squash_commit_sha),
            message: (!merged).then(|| format!("merge request is {}", response.state)),
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
        debug!(%pr, "creating MR comment");
        self.client
            .post(self.mr_url(pr, "/notes"))
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;

        debug!(%pr, "created MR comment");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabelAction;

    #[test]
    fn test_project_path_is_encoded() {
        assert_eq!(
            GitLabService::encoded_project("group/sub", "repo"),
            "group%2Fsub%2Frepo"
        );
    }

    #[test]
    fn test_default_host_is_not_recorded() {
        let service = GitLabService::new("t".to_string(), Some("gitlab.com".to_string())).unwrap();
        assert!(service.config().host.is_none());
        assert_eq!(service.api_url("/x"), "https://gitlab.com/api/v4/x");
    }

    #[test]
    fn test_self_hosted_api_url() {
        let service =
            GitLabService::new("t".to_string(), Some("git.example.org".to_string())).unwrap();
        assert_eq!(service.config().host.as_deref(), Some("git.example.org"));
        let pr = PrRef::new("acme", "widgets", 7);
        assert_eq!(
            service.mr_url(&pr, "/notes"),
            "https://git.example.org/api/v4/projects/acme%2Fwidgets/merge_requests/7/notes"
        );
    }

    #[test]
    fn test_label_event_with_deleted_label_is_dropped() {
        let event: LabelEvent = serde_json::from_str(
            r#"{"action":"add","user":{"username":"bot"},"label":null,
                "created_at":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(event.into_log_entry().is_none());
    }

    #[test]
    fn test_label_event_keeps_comma_in_name() {
        let event: LabelEvent = serde_json::from_str(
            r#"{"action":"add","user":{"username":"bot"},"label":{"name":"ci, passed"},
                "created_at":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        let entry = event.into_log_entry().unwrap();
        assert_eq!(entry.action, LabelAction::Added);
        assert!(entry.adds_label("ci, passed"));
        assert!(!entry.adds_label("ci"));
    }
}
