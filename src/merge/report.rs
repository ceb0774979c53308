//! Markdown rendering of merge-gate failures for PR comments

use crate::config::RepoPolicy;
use crate::error::Error;
use crate::labels::{APPROVED_LABEL, LGTM_LABEL};

/// Join provenance failures under a pluralized "not ready" header
pub fn render_not_ready(reasons: &[String]) -> String {
    let subject = if reasons.len() > 1 {
        "labels are"
    } else {
        "label is"
    };
    format!(
        "**The following {subject} not ready**.\n\n{}",
        reasons.join("\n\n")
    )
}

/// Render unmet policy conditions
pub fn render_not_eligible(reasons: &[String]) -> String {
    format!(
        "**This pull request can not be merged yet**.\n\n{}",
        reasons.join("\n\n")
    )
}

/// General explanation of how gating labels are obtained
pub fn label_guide(policy: &RepoPolicy) -> String {
    let review = if policy.lgtm_counts_required > 1 {
        format!(
            "***{LGTM_LABEL}-<login>*** is added when a reviewer comments `/lgtm`; \
             {} of them are required.",
            policy.lgtm_counts_required
        )
    } else {
        format!("***{LGTM_LABEL}*** is added when a reviewer comments `/lgtm`.")
    };
    format!(
        "{review}\n***{APPROVED_LABEL}*** is added when a maintainer comments `/approve`.\n\
         Comment `/check-pr` to try again once all conditions are met."
    )
}

/// Comment to post on the PR for a failed merge-gate run
///
/// Returns `None` for errors that are not meant for PR participants
/// (transport and setup failures).
pub fn failure_comment(err: &Error, policy: &RepoPolicy) -> Option<String> {
    match err {
        Error::LabelsNotReady(reasons) => Some(render_not_ready(reasons)),
        Error::NotEligible(reasons) => Some(render_not_eligible(reasons)),
        Error::MergeFailed(message) => Some(format!(
            "**Failed to merge this pull request**: {message}\n\n{}",
            label_guide(policy)
        )),
        _ => None,
    }
}
