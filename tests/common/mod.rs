//! Shared test helpers

#![allow(dead_code)]

pub mod mock_platform;

pub use mock_platform::MockPlatformService;

use chrono::{DateTime, Duration, TimeZone, Utc};
use merge_gate::config::RepoPolicy;
use merge_gate::types::{OperationLogEntry, PrRef};

/// Identity the mock forge attributes bot label changes to
pub const BOT: &str = "gate-bot";

/// PR `acme/widgets#number`
pub fn pr(number: u64) -> PrRef {
    PrRef::new("acme", "widgets", number)
}

/// Policy covering `acme/widgets` with `BOT` as legal operator
pub fn policy() -> RepoPolicy {
    let mut policy = RepoPolicy::new(BOT);
    policy.scope = vec!["acme/widgets".to_string()];
    policy
}

/// Policy requiring `required` per-reviewer lgtm labels
pub fn policy_with_reviews(required: u32) -> RepoPolicy {
    let mut policy = policy();
    policy.lgtm_counts_required = required;
    policy
}

/// Fixed timestamp `minute` minutes into 2024
pub fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
}

/// Log entry recording `actor` adding `labels` at `minute`
pub fn added(actor: &str, labels: &[&str], minute: i64) -> OperationLogEntry {
    OperationLogEntry::label_added(actor, labels, at(minute))
}

/// Mock forge with `BOT` granted permission
pub fn mock() -> MockPlatformService {
    let mock = MockPlatformService::new(BOT);
    mock.grant(BOT);
    mock
}
