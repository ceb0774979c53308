//! Provenance validation - who added each gating label
//!
//! A gating label only counts when the latest operation log entry that added
//! it names the policy's legal operator. Labels without any such entry are
//! never trusted, even though the forge reports them as present.

use crate::config::RepoPolicy;
use crate::labels::{LabelKind, LabelSet};
use crate::types::OperationLogEntry;
use tracing::debug;

/// Latest log entry that added `label`
///
/// Every addition counts, including those without a known actor. When two
/// entries share the same timestamp the one appearing first in the log wins.
pub fn latest_addition<'a>(
    log: &'a [OperationLogEntry],
    label: &str,
) -> Option<&'a OperationLogEntry> {
    let mut latest: Option<&OperationLogEntry> = None;

    for entry in log {
        if !entry.adds_label(label) {
            continue;
        }
        if latest.is_none_or(|current| entry.created_at > current.created_at) {
            latest = Some(entry);
        }
    }

    latest
}

/// Reason reported for a gating label without any addition record
pub fn missing_log_reason(label: &str) -> String {
    format!(
        "The corresponding operation log is missing. you should delete the label **{label}** \
         and add it again by correct way"
    )
}

/// Reason reported for a gating label added by someone other than the legal operator
pub fn illegal_operator_reason(actor: &str, label: &str) -> String {
    format!("{actor} You can't add {label} by yourself, please contact the maintainers")
}

/// Check one present label; `None` means the label is legitimate
pub fn check_label(
    log: &[OperationLogEntry],
    label: &str,
    legal_operator: &str,
) -> Option<String> {
    let Some(entry) = latest_addition(log, label) else {
        debug!(label, "no addition record for gating label");
        return Some(missing_log_reason(label));
    };

    // Unattributed additions count as missing
    if entry.actor.is_empty() {
        debug!(label, "latest addition of gating label has no actor");
        return Some(missing_log_reason(label));
    }

    if entry.actor != legal_operator {
        debug!(label, actor = %entry.actor, "gating label added by unauthorized actor");
        return Some(illegal_operator_reason(&entry.actor, label));
    }

    None
}

/// Validate provenance of every gating label present on the PR
///
/// Gating labels are the approval label, every review label, and the
/// policy's required-extra labels. Other labels are never checked. All
/// failures are collected in label order.
pub fn validate_provenance(
    policy: &RepoPolicy,
    labels: &LabelSet,
    log: &[OperationLogEntry],
) -> Vec<String> {
    labels
        .iter()
        .filter(|label| match label.kind {
            LabelKind::Approval | LabelKind::Review { .. } => true,
            LabelKind::MergeMethod(_) | LabelKind::Other => {
                policy.labels_for_merge.contains(&label.name)
            }
        })
        .filter_map(|label| check_label(log, &label.name, &policy.legal_operator))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn added(actor: &str, label: &str, secs: i64) -> OperationLogEntry {
        OperationLogEntry::label_added(actor, &[label], at(secs))
    }

    #[test]
    fn test_latest_addition_picks_newest() {
        let log = vec![
            added("alice", "approved", 0),
            added("mallory", "approved", 10),
            added("bot", "lgtm", 20),
        ];
        assert_eq!(latest_addition(&log, "approved").unwrap().actor, "mallory");
    }

    #[test]
    fn test_latest_addition_tie_keeps_first_seen() {
        let log = vec![added("alice", "approved", 5), added("mallory", "approved", 5)];
        assert_eq!(latest_addition(&log, "approved").unwrap().actor, "alice");
    }

    #[test]
    fn test_latest_addition_out_of_order_log() {
        let log = vec![added("mallory", "approved", 30), added("alice", "approved", 5)];
        assert_eq!(latest_addition(&log, "approved").unwrap().actor, "mallory");
    }

    #[test]
    fn test_latest_addition_ignores_removals() {
        let log = vec![OperationLogEntry::label_removed("alice", &["approved"], at(50))];
        assert!(latest_addition(&log, "approved").is_none());
    }

    #[test]
    fn test_newer_unattributed_addition_shadows_legal_one() {
        let log = vec![added("alice", "approved", 1), added("", "approved", 2)];
        assert_eq!(latest_addition(&log, "approved").unwrap().actor, "");
        assert_eq!(
            check_label(&log, "approved", "alice"),
            Some(missing_log_reason("approved"))
        );
    }

    #[test]
    fn test_check_label_reasons() {
        let log = vec![added("mallory", "approved", 0)];
        assert_eq!(
            check_label(&log, "approved", "alice").unwrap(),
            "mallory You can't add approved by yourself, please contact the maintainers"
        );
        assert_eq!(
            check_label(&[], "approved", "alice").unwrap(),
            "The corresponding operation log is missing. you should delete the label \
             **approved** and add it again by correct way"
        );
        assert!(check_label(&[added("alice", "approved", 0)], "approved", "alice").is_none());
    }

    #[test]
    fn test_validate_skips_cosmetic_labels() {
        let policy = RepoPolicy::new("alice");
        let labels = LabelSet::from_raw(["kind/bug", "merge/squash", "approved"]);
        let log = vec![added("alice", "approved", 0)];
        assert!(validate_provenance(&policy, &labels, &log).is_empty());
    }

    #[test]
    fn test_validate_checks_required_extra_labels() {
        let mut policy = RepoPolicy::new("alice");
        policy.labels_for_merge = vec!["ci-passed".to_string()];
        let labels = LabelSet::from_raw(["ci-passed"]);
        let reasons = validate_provenance(&policy, &labels, &[]);
        assert_eq!(reasons, vec![missing_log_reason("ci-passed")]);
    }

    #[test]
    fn test_validate_collects_every_failure() {
        let policy = RepoPolicy::new("alice");
        let labels = LabelSet::from_raw(["approved", "lgtm-bob", "lgtm-carol"]);
        let log = vec![added("bob", "lgtm-bob", 0), added("alice", "lgtm-carol", 1)];
        let reasons = validate_provenance(&policy, &labels, &log);
        assert_eq!(
            reasons,
            vec![
                missing_log_reason("approved"),
                illegal_operator_reason("bob", "lgtm-bob"),
            ]
        );
    }
}
