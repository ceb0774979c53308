//! Merge planning - pure functions for deciding a PR's fate
//!
//! This module contains the pure, testable logic of the merge gate.
//! No I/O happens here - labels and the operation log are fetched
//! beforehand, making it easy to unit test.

use crate::config::RepoPolicy;
use crate::labels::LabelSet;
use crate::merge::eligibility::evaluate_eligibility;
use crate::merge::provenance::validate_provenance;
use crate::merge::strategy::select_merge_method;
use crate::types::{MergeMethod, OperationLogEntry, PrRef};

/// Progress of one merge-gate run
///
/// Stages advance strictly in declaration order. A run that stops early
/// reports the last stage it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MergeStage {
    /// Nothing fetched yet
    Start,
    /// Current labels fetched
    LabelsFetched,
    /// Operation log fetched
    LogFetched,
    /// Provenance of every gating label verified
    ProvenanceChecked,
    /// Policy conditions verified
    EligibilityChecked,
    /// Merge method chosen
    StrategySelected,
    /// The forge merged the PR
    Merged,
}

impl std::fmt::Display for MergeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::LabelsFetched => "labels-fetched",
            Self::LogFetched => "log-fetched",
            Self::ProvenanceChecked => "provenance-checked",
            Self::EligibilityChecked => "eligibility-checked",
            Self::StrategySelected => "strategy-selected",
            Self::Merged => "merged",
        };
        f.write_str(name)
    }
}

/// Gathered forge state for one PR
///
/// Holds everything the plan needs, fetched beforehand by
/// [`gather_merge_inputs`](crate::merge::gather_merge_inputs).
#[derive(Debug, Clone)]
pub struct MergeInputs {
    /// The PR being evaluated
    pub pr: PrRef,
    /// Labels currently on the PR
    pub labels: LabelSet,
    /// Label operation history of the PR
    pub log: Vec<OperationLogEntry>,
}

/// Why a PR cannot be merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocker {
    /// Gating labels with missing or illegitimate provenance
    LabelsNotReady(Vec<String>),
    /// Unmet policy conditions
    NotEligible(Vec<String>),
}

impl Blocker {
    /// Reasons behind the blocker
    pub fn reasons(&self) -> &[String] {
        match self {
            Self::LabelsNotReady(reasons) | Self::NotEligible(reasons) => reasons,
        }
    }
}

/// Decision reached by the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    /// Merge with this method
    Merge(MergeMethod),
    /// Do not merge
    Blocked(Blocker),
}

/// Merge plan - the functional core output
///
/// Created by [`create_merge_plan`] (pure) and carried out by
/// [`execute_merge_plan`](crate::merge::execute_merge_plan) (effectful).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// The PR this plan is for
    pub pr: PrRef,
    /// Last stage the plan completed
    pub reached: MergeStage,
    /// What to do with the PR
    pub decision: MergeDecision,
}

impl MergePlan {
    /// Whether the PR should be merged
    pub const fn is_mergeable(&self) -> bool {
        matches!(self.decision, MergeDecision::Merge(_))
    }

    /// Selected merge method, if the PR is mergeable
    pub const fn method(&self) -> Option<&MergeMethod> {
        match &self.decision {
            MergeDecision::Merge(method) => Some(method),
            MergeDecision::Blocked(_) => None,
        }
    }

    /// Reasons the PR is blocked (empty when mergeable)
    pub fn reasons(&self) -> &[String] {
        match &self.decision {
            MergeDecision::Merge(_) => &[],
            MergeDecision::Blocked(blocker) => blocker.reasons(),
        }
    }
}

/// Create a merge plan (PURE - no I/O, easily testable)
///
/// Provenance runs first; eligibility only runs once every gating label is
/// legitimate, and the merge method is only chosen for eligible PRs.
pub fn create_merge_plan(inputs: &MergeInputs, policy: &RepoPolicy) -> MergePlan {
    let blocked = |reached, blocker| MergePlan {
        pr: inputs.pr.clone(),
        reached,
        decision: MergeDecision::Blocked(blocker),
    };

    let not_ready = validate_provenance(policy, &inputs.labels, &inputs.log);
    if !not_ready.is_empty() {
        return blocked(MergeStage::LogFetched, Blocker::LabelsNotReady(not_ready));
    }

    let unmet = evaluate_eligibility(policy, &inputs.labels);
    if !unmet.is_empty() {
        return blocked(MergeStage::ProvenanceChecked, Blocker::NotEligible(unmet));
    }

    MergePlan {
        pr: inputs.pr.clone(),
        reached: MergeStage::StrategySelected,
        decision: MergeDecision::Merge(select_merge_method(&inputs.labels, policy)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn inputs(labels: &[&str], log: Vec<OperationLogEntry>) -> MergeInputs {
        MergeInputs {
            pr: PrRef::new("acme", "widgets", 1),
            labels: LabelSet::from_raw(labels),
            log,
        }
    }

    #[test]
    fn test_plan_merges_when_everything_checks_out() {
        let log = vec![OperationLogEntry::label_added(
            "alice",
            &["approved", "lgtm"],
            Utc::now(),
        )];
        let plan = create_merge_plan(
            &inputs(&["approved", "lgtm"], log),
            &RepoPolicy::new("alice"),
        );
        assert!(plan.is_mergeable());
        assert_eq!(plan.reached, MergeStage::StrategySelected);
        assert_eq!(plan.method(), Some(&MergeMethod::Merge));
        assert!(plan.reasons().is_empty());
    }

    #[test]
    fn test_provenance_failure_skips_eligibility() {
        // "lgtm" is also missing, but only the provenance problem is reported
        let plan = create_merge_plan(&inputs(&["approved"], vec![]), &RepoPolicy::new("alice"));
        assert_eq!(plan.reached, MergeStage::LogFetched);
        assert!(matches!(
            plan.decision,
            MergeDecision::Blocked(Blocker::LabelsNotReady(ref r)) if r.len() == 1
        ));
    }

    #[test]
    fn test_eligibility_failure_after_provenance() {
        let log = vec![OperationLogEntry::label_added("alice", &["approved"], Utc::now())];
        let plan = create_merge_plan(&inputs(&["approved"], log), &RepoPolicy::new("alice"));
        assert_eq!(plan.reached, MergeStage::ProvenanceChecked);
        assert_eq!(
            plan.decision,
            MergeDecision::Blocked(Blocker::NotEligible(vec![
                "PR does not have these labels: ***lgtm***".to_string()
            ]))
        );
    }

    #[test]
    fn test_stage_order() {
        assert!(MergeStage::Start < MergeStage::LabelsFetched);
        assert!(MergeStage::StrategySelected < MergeStage::Merged);
        assert_eq!(MergeStage::LogFetched.to_string(), "log-fetched");
    }
}
