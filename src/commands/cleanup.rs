//! Reset review state when a PR's code changes

use crate::commands::messages;
use crate::error::Result;
use crate::labels::{LabelKind, LabelSet};
use crate::platform::PlatformService;
use crate::types::PrRef;
use tracing::{info, warn};

/// Why review labels are being cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    /// New commits were pushed to the PR source
    SourceUpdated,
    /// The PR was reopened
    Reopened,
}

/// Remove every review label and `approved` from `pr`, then say so in a comment
///
/// Returns the labels removed. Fetching labels is required; removal and the
/// follow-up comment are best effort and only logged on failure.
pub async fn clear_review_labels(
    platform: &dyn PlatformService,
    pr: &PrRef,
    reason: ClearReason,
) -> Result<Vec<String>> {
    let labels = LabelSet::from_raw(platform.get_labels(pr).await?);
    let stale: Vec<String> = labels
        .iter()
        .filter(|l| matches!(l.kind, LabelKind::Review { .. } | LabelKind::Approval))
        .map(|l| l.name.clone())
        .collect();

    if stale.is_empty() {
        return Ok(stale);
    }

    if let Err(e) = platform.remove_labels(pr, &stale).await {
        warn!(%pr, error = %e, labels = ?stale, "failed to clear review labels");
        return Ok(Vec::new());
    }
    info!(%pr, ?reason, labels = ?stale, "cleared review labels");

    if let Err(e) = platform
        .create_pr_comment(pr, &messages::labels_cleared(reason, &stale))
        .await
    {
        warn!(%pr, error = %e, "failed to comment on cleared labels");
    }
    Ok(stale)
}
