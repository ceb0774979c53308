//! Merge strategy selection from `merge/<method>` labels

use crate::config::RepoPolicy;
use crate::labels::{LabelKind, LabelSet};
use crate::types::MergeMethod;

/// Pick the merge method for the PR
///
/// The first `merge/<method>` label wins; squash aliases normalize to
/// `squash`. Without a usable label the policy default applies. Never fails.
pub fn select_merge_method(labels: &LabelSet, policy: &RepoPolicy) -> MergeMethod {
    labels
        .merge_method_label()
        .and_then(|label| match &label.kind {
            LabelKind::MergeMethod(method) if !method.trim().is_empty() => {
                Some(MergeMethod::from_name(method))
            }
            _ => None,
        })
        .unwrap_or_else(|| policy.default_merge_method())
}
