//! `/lgtm` and `/approve` handlers

use crate::commands::{CommandAction, messages, remove_present};
use crate::config::RepoPolicy;
use crate::error::Result;
use crate::labels::{APPROVED_LABEL, LGTM_LABEL, LabelSet, review_label_for};
use crate::platform::PlatformService;
use crate::types::CommentEvent;
use tracing::info;

fn is_author(event: &CommentEvent) -> bool {
    event.author.eq_ignore_ascii_case(&event.commenter)
}

async fn permitted(platform: &dyn PlatformService, event: &CommentEvent) -> Result<bool> {
    platform
        .check_permission(&event.pr.owner, &event.pr.repo, &event.commenter)
        .await
}

pub async fn add_lgtm(
    platform: &dyn PlatformService,
    policy: &RepoPolicy,
    event: &CommentEvent,
) -> Result<CommandAction> {
    let pr = &event.pr;
    if is_author(event) {
        platform.create_pr_comment(pr, messages::SELF_LGTM).await?;
        return Ok(CommandAction::Refused);
    }

    if !permitted(platform, event).await? {
        info!(%pr, commenter = %event.commenter, "reviewer lacks permission for lgtm");
        platform
            .create_pr_comment(pr, &messages::review_thanks(&event.commenter))
            .await?;
        return Ok(CommandAction::Denied);
    }

    let label = review_label_for(&event.commenter, policy.lgtm_counts_required);
    platform.add_labels(pr, std::slice::from_ref(&label)).await?;
    platform
        .create_pr_comment(pr, &messages::label_added(&label, &event.commenter))
        .await?;
    Ok(CommandAction::LabelAdded(label))
}

/// The author may withdraw every review; a reviewer only their own
pub async fn remove_lgtm(
    platform: &dyn PlatformService,
    policy: &RepoPolicy,
    event: &CommentEvent,
) -> Result<CommandAction> {
    let pr = &event.pr;
    if is_author(event) {
        let labels = LabelSet::from_raw(platform.get_labels(pr).await?);
        let review: Vec<String> = labels
            .review_labels()
            .into_iter()
            .map(|l| l.name.clone())
            .collect();
        if !review.is_empty() {
            platform.remove_labels(pr, &review).await?;
        }
        return Ok(CommandAction::LabelsRemoved(review));
    }

    if !permitted(platform, event).await? {
        platform
            .create_pr_comment(
                pr,
                &messages::no_permission(&event.commenter, "remove", LGTM_LABEL),
            )
            .await?;
        return Ok(CommandAction::Denied);
    }

    let label = review_label_for(&event.commenter, policy.lgtm_counts_required);
    let removed = remove_present(platform, pr, std::slice::from_ref(&label)).await?;
    platform
        .create_pr_comment(pr, &messages::label_removed(&label, &event.commenter))
        .await?;
    Ok(CommandAction::LabelsRemoved(removed))
}

pub async fn add_approve(
    platform: &dyn PlatformService,
    event: &CommentEvent,
) -> Result<CommandAction> {
    let pr = &event.pr;
    if !permitted(platform, event).await? {
        platform
            .create_pr_comment(
                pr,
                &messages::no_permission(&event.commenter, "add", APPROVED_LABEL),
            )
            .await?;
        return Ok(CommandAction::Denied);
    }

    platform
        .add_labels(pr, &[APPROVED_LABEL.to_string()])
        .await?;
    platform
        .create_pr_comment(pr, &messages::label_added(APPROVED_LABEL, &event.commenter))
        .await?;
    Ok(CommandAction::LabelAdded(APPROVED_LABEL.to_string()))
}

pub async fn remove_approve(
    platform: &dyn PlatformService,
    event: &CommentEvent,
) -> Result<CommandAction> {
    let pr = &event.pr;
    if !permitted(platform, event).await? {
        platform
            .create_pr_comment(
                pr,
                &messages::no_permission(&event.commenter, "remove", APPROVED_LABEL),
            )
            .await?;
        return Ok(CommandAction::Denied);
    }

    let removed = remove_present(platform, pr, &[APPROVED_LABEL.to_string()]).await?;
    platform
        .create_pr_comment(
            pr,
            &messages::label_removed(APPROVED_LABEL, &event.commenter),
        )
        .await?;
    Ok(CommandAction::LabelsRemoved(removed))
}
