//! Merge execution - effectful operations
//!
//! Gathers forge state for a PR, and carries out a `MergePlan` (created by
//! the pure planning functions) via the platform API.

use crate::config::RepoPolicy;
use crate::error::{Error, Result};
use crate::labels::LabelSet;
use crate::merge::plan::{
    Blocker, MergeDecision, MergeInputs, MergePlan, MergeStage, create_merge_plan,
};
use crate::platform::PlatformService;
use crate::types::{MergeMethod, PrRef};
use tracing::{debug, info};

/// Result of a successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged PR
    pub pr: PrRef,
    /// Method the forge was asked to use
    pub method: MergeMethod,
    /// The SHA of the merge commit (if reported)
    pub sha: Option<String>,
    /// Always [`MergeStage::Merged`]
    pub stage: MergeStage,
}

/// Fetch labels, then the operation log, for `pr`
///
/// Either fetch failing aborts with a retryable [`Error::Fetch`].
pub async fn gather_merge_inputs(
    platform: &dyn PlatformService,
    pr: &PrRef,
) -> Result<MergeInputs> {
    let raw = platform
        .get_labels(pr)
        .await
        .map_err(|e| Error::fetch("labels", e))?;
    let labels = LabelSet::from_raw(&raw);
    debug!(%pr, stage = %MergeStage::LabelsFetched, labels = ?labels.names(), "fetched labels");

    let log = platform
        .list_operation_logs(pr)
        .await
        .map_err(|e| Error::fetch("operation log", e))?;
    debug!(%pr, stage = %MergeStage::LogFetched, entries = log.len(), "fetched operation log");

    Ok(MergeInputs {
        pr: pr.clone(),
        labels,
        log,
    })
}

/// Execute the merge plan (EFFECTFUL)
///
/// Blocked plans become policy errors without touching the forge. Mergeable
/// plans invoke the merge capability; a refusal becomes [`Error::MergeFailed`].
pub async fn execute_merge_plan(
    plan: &MergePlan,
    platform: &dyn PlatformService,
) -> Result<MergeOutcome> {
    let method = match &plan.decision {
        MergeDecision::Merge(method) => method,
        MergeDecision::Blocked(Blocker::LabelsNotReady(reasons)) => {
            info!(pr = %plan.pr, count = reasons.len(), "gating labels not ready");
            return Err(Error::LabelsNotReady(reasons.clone()));
        }
        MergeDecision::Blocked(Blocker::NotEligible(reasons)) => {
            info!(pr = %plan.pr, count = reasons.len(), "PR not eligible to merge");
            return Err(Error::NotEligible(reasons.clone()));
        }
    };

    info!(pr = %plan.pr, %method, "merging PR");
    let result = match platform.merge_pr(&plan.pr, method).await {
        Ok(result) => result,
        Err(e) => return Err(Error::MergeFailed(e.to_string())),
    };

    if !result.merged {
        return Err(Error::MergeFailed(
            result
                .message
                .unwrap_or_else(|| "the forge did not merge the pull request".to_string()),
        ));
    }

    debug!(pr = %plan.pr, sha = ?result.sha, stage = %MergeStage::Merged, "merge complete");
    Ok(MergeOutcome {
        pr: plan.pr.clone(),
        method: method.clone(),
        sha: result.sha,
        stage: MergeStage::Merged,
    })
}

/// Run the whole merge gate for one PR: gather, plan, execute
///
/// Holds no state between calls; every run re-reads labels and the log.
pub async fn run_merge_gate(
    platform: &dyn PlatformService,
    pr: &PrRef,
    policy: &RepoPolicy,
) -> Result<MergeOutcome> {
    let inputs = gather_merge_inputs(platform, pr).await?;
    let plan = create_merge_plan(&inputs, policy);
    execute_merge_plan(&plan, platform).await
}
