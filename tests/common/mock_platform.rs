//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use merge_gate::error::{Error, Result};
use merge_gate::platform::PlatformService;
use merge_gate::types::{
    MergeMethod, MergeResult, OperationLogEntry, Platform, PlatformConfig, PrRef,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub method: MergeMethod,
}

/// Call record for `add_labels` / `remove_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCall {
    pub pr_number: u64,
    pub labels: Vec<String>,
}

/// In-memory forge for testing
///
/// Label mutations made through the trait are recorded in the operation log
/// under the bot identity, the way a forge attributes them to the token
/// owner. Timestamps advance one minute per recorded entry.
///
/// Features:
/// - Label state and operation log per PR
/// - Permission table (unknown users are denied)
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    bot: String,
    clock: Mutex<DateTime<Utc>>,
    labels: Mutex<HashMap<u64, Vec<String>>>,
    logs: Mutex<HashMap<u64, Vec<OperationLogEntry>>>,
    permissions: Mutex<HashMap<String, bool>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    get_labels_calls: AtomicUsize,
    list_logs_calls: AtomicUsize,
    add_label_calls: Mutex<Vec<LabelCall>>,
    remove_label_calls: Mutex<Vec<LabelCall>>,
    permission_calls: Mutex<Vec<String>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    // Error injection
    error_on_get_labels: Mutex<Option<String>>,
    error_on_list_logs: Mutex<Option<String>>,
    error_on_remove_labels: Mutex<Option<String>>,
    error_on_permission: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock acting as `bot`
    pub fn new(bot: &str) -> Self {
        Self {
            config: PlatformConfig {
                platform: Platform::GitHub,
                host: None,
            },
            bot: bot.to_string(),
            clock: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            labels: Mutex::new(HashMap::new()),
            logs: Mutex::new(HashMap::new()),
            permissions: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            get_labels_calls: AtomicUsize::new(0),
            list_logs_calls: AtomicUsize::new(0),
            add_label_calls: Mutex::new(Vec::new()),
            remove_label_calls: Mutex::new(Vec::new()),
            permission_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            error_on_get_labels: Mutex::new(None),
            error_on_list_logs: Mutex::new(None),
            error_on_remove_labels: Mutex::new(None),
            error_on_permission: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
        }
    }

    fn tick(&self) -> DateTime<Utc> {
        let mut clock = self.clock.lock().unwrap();
        *clock += Duration::minutes(1);
        *clock
    }

    fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
        slot.lock()
            .unwrap()
            .as_ref()
            .map_or(Ok(()), |msg| Err(Error::Platform(msg.clone())))
    }

    // === Setup methods ===

    /// Replace the labels on a PR without touching the log
    pub fn set_labels(&self, pr_number: u64, labels: &[&str]) {
        self.labels.lock().unwrap().insert(
            pr_number,
            labels.iter().map(ToString::to_string).collect(),
        );
    }

    /// Append a raw log entry
    pub fn push_log(&self, pr_number: u64, entry: OperationLogEntry) {
        self.logs
            .lock()
            .unwrap()
            .entry(pr_number)
            .or_default()
            .push(entry);
    }

    /// Attach `label` as `actor`, recording the addition in the log
    pub fn attach_label_as(&self, pr_number: u64, actor: &str, label: &str) {
        let at = self.tick();
        {
            let mut labels = self.labels.lock().unwrap();
            let current = labels.entry(pr_number).or_default();
            if !current.iter().any(|l| l == label) {
                current.push(label.to_string());
            }
        }
        self.push_log(pr_number, OperationLogEntry::label_added(actor, &[label], at));
    }

    /// Allow `user` to operate gating labels
    pub fn grant(&self, user: &str) {
        self.permissions
            .lock()
            .unwrap()
            .insert(user.to_string(), true);
    }

    /// Set the response for `merge_pr` for a specific PR
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    // === Error injection methods ===

    /// Make `get_labels` return an error
    pub fn fail_get_labels(&self, msg: &str) {
        *self.error_on_get_labels.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_operation_logs` return an error
    pub fn fail_list_logs(&self, msg: &str) {
        *self.error_on_list_logs.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `remove_labels` return an error
    pub fn fail_remove_labels(&self, msg: &str) {
        *self.error_on_remove_labels.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `check_permission` return an error
    pub fn fail_permission(&self, msg: &str) {
        *self.error_on_permission.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Inspection methods ===

    /// Current labels on a PR
    pub fn labels(&self, pr_number: u64) -> Vec<String> {
        self.labels
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default()
    }

    /// Comment bodies posted on a PR
    pub fn comments(&self, pr_number: u64) -> Vec<String> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.pr_number == pr_number)
            .map(|c| c.body.clone())
            .collect()
    }

    pub fn get_labels_count(&self) -> usize {
        self.get_labels_calls.load(Ordering::SeqCst)
    }

    pub fn list_logs_count(&self) -> usize {
        self.list_logs_calls.load(Ordering::SeqCst)
    }

    pub fn get_add_label_calls(&self) -> Vec<LabelCall> {
        self.add_label_calls.lock().unwrap().clone()
    }

    pub fn get_remove_label_calls(&self) -> Vec<LabelCall> {
        self.remove_label_calls.lock().unwrap().clone()
    }

    pub fn get_permission_calls(&self) -> Vec<String> {
        self.permission_calls.lock().unwrap().clone()
    }

    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    // === Assertion helpers ===

    /// Assert exactly one merge happened, with `method`
    pub fn assert_merged_with(&self, pr_number: u64, method: &MergeMethod) {
        let calls = self.get_merge_pr_calls();
        assert_eq!(calls.len(), 1, "expected one merge call, got {calls:?}");
        assert_eq!(calls[0].pr_number, pr_number);
        assert_eq!(&calls[0].method, method);
    }

    /// Assert the merge capability was never invoked
    pub fn assert_not_merged(&self) {
        let calls = self.get_merge_pr_calls();
        assert!(calls.is_empty(), "expected no merge calls, got {calls:?}");
    }

    /// Assert the last comment on a PR contains `needle`
    pub fn assert_last_comment_contains(&self, pr_number: u64, needle: &str) {
        let comments = self.comments(pr_number);
        let last = comments
            .last()
            .unwrap_or_else(|| panic!("no comments on PR #{pr_number}"));
        assert!(
            last.contains(needle),
            "expected last comment to contain {needle:?}, got {last:?}"
        );
    }

    /// Assert nothing was posted on a PR
    pub fn assert_no_comments(&self, pr_number: u64) {
        let comments = self.comments(pr_number);
        assert!(comments.is_empty(), "expected no comments, got {comments:?}");
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_labels(&self, pr: &PrRef) -> Result<Vec<String>> {
        self.get_labels_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.error_on_get_labels)?;
        Ok(self.labels(pr.number))
    }

    async fn list_operation_logs(&self, pr: &PrRef) -> Result<Vec<OperationLogEntry>> {
        self.list_logs_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.error_on_list_logs)?;
        Ok(self
            .logs
            .lock()
            .unwrap()
            .get(&pr.number)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_labels(&self, pr: &PrRef, labels: &[String]) -> Result<()> {
        self.add_label_calls.lock().unwrap().push(LabelCall {
            pr_number: pr.number,
            labels: labels.to_vec(),
        });
        let bot = self.bot.clone();
        for label in labels {
            self.attach_label_as(pr.number, &bot, label);
        }
        Ok(())
    }

    async fn remove_labels(&self, pr: &PrRef, labels: &[String]) -> Result<()> {
        self.remove_label_calls.lock().unwrap().push(LabelCall {
            pr_number: pr.number,
            labels: labels.to_vec(),
        });
        Self::injected(&self.error_on_remove_labels)?;

        let at = self.tick();
        self.labels
            .lock()
            .unwrap()
            .entry(pr.number)
            .or_default()
            .retain(|l| !labels.contains(l));
        let names: Vec<&str> = labels.iter().map(String::as_str).collect();
        self.push_log(pr.number, OperationLogEntry::label_removed(&self.bot, &names, at));
        Ok(())
    }

    async fn check_permission(&self, _owner: &str, _repo: &str, user: &str) -> Result<bool> {
        self.permission_calls.lock().unwrap().push(user.to_string());
        Self::injected(&self.error_on_permission)?;
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .get(user)
            .copied()
            .unwrap_or(false))
    }

    async fn merge_pr(&self, pr: &PrRef, method: &MergeMethod) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr_number: pr.number,
            method: method.clone(),
        });
        Self::injected(&self.error_on_merge_pr)?;

        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&pr.number)
            .cloned()
            .unwrap_or(MergeResult {
                merged: true,
                sha: Some("abc123".to_string()),
                message: None,
            }))
    }

    async fn create_pr_comment(&self, pr: &PrRef, body: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number: pr.number,
                body: body.to_string(),
            });
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
