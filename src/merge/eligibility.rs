//! Eligibility evaluation - pure policy checks over the label set
//!
//! Every check runs and contributes at most one reason, in a fixed order:
//! forbidden labels, missing required labels, review threshold. An empty
//! list means the PR is eligible.

use crate::config::RepoPolicy;
use crate::labels::{APPROVED_LABEL, LGTM_LABEL, LabelSet};

/// Labels that must be present on the PR
///
/// Approval first, then the policy's extra labels in configured order, then
/// the `lgtm` literal when a single review is required. With more than one
/// required review the review labels are counted instead, since reviewer
/// identities are not known to the policy.
pub fn required_labels(policy: &RepoPolicy) -> Vec<&str> {
    let mut required = vec![APPROVED_LABEL];
    for label in &policy.labels_for_merge {
        if !label.is_empty() && !required.contains(&label.as_str()) {
            required.push(label);
        }
    }
    if policy.lgtm_counts_required <= 1 && !required.contains(&LGTM_LABEL) {
        required.push(LGTM_LABEL);
    }
    required
}

/// Evaluate the PR's labels against the policy
///
/// Forbidden labels that are present are joined into a single
/// `PR should remove these labels: a, b` reason in policy order, not one
/// reason per label.
pub fn evaluate_eligibility(policy: &RepoPolicy, labels: &LabelSet) -> Vec<String> {
    let mut reasons = Vec::new();

    let forbidden: Vec<&str> = policy
        .labels_not_allow_merge
        .iter()
        .map(String::as_str)
        .filter(|l| labels.has_label(l))
        .collect();
    if !forbidden.is_empty() {
        reasons.push(format!(
            "PR should remove these labels: {}",
            forbidden.join(", ")
        ));
    }

    let missing: Vec<String> = required_labels(policy)
        .into_iter()
        .filter(|l| !labels.has_label(l))
        .map(|l| format!("***{l}***"))
        .collect();
    if !missing.is_empty() {
        reasons.push(format!(
            "PR does not have these labels: {}",
            missing.join(", ")
        ));
    }

    let required = policy.lgtm_counts_required;
    if required > 1 {
        let present = labels.review_labels().len();
        if present < required as usize {
            reasons.push(format!(
                "PR needs {required} {LGTM_LABEL} labels and now gets {present}"
            ));
        }
    }

    reasons
}
