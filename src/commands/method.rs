//! `/rebase` and `/squash` handlers

use crate::commands::{CommandAction, messages, remove_present};
use crate::error::Result;
use crate::labels::{REBASE_LABEL, SQUASH_LABEL};
use crate::platform::PlatformService;
use crate::types::CommentEvent;
use tracing::info;

/// A merge-method command, the label it controls, and its counterpart
pub struct MethodCommand {
    name: &'static str,
    label: &'static str,
    opposite_name: &'static str,
    opposite_label: &'static str,
}

pub const REBASE: MethodCommand = MethodCommand {
    name: "rebase",
    label: REBASE_LABEL,
    opposite_name: "squash",
    opposite_label: SQUASH_LABEL,
};

pub const SQUASH: MethodCommand = MethodCommand {
    name: "squash",
    label: SQUASH_LABEL,
    opposite_name: "rebase",
    opposite_label: REBASE_LABEL,
};

/// Attach the method label unless the opposite method is already chosen
///
/// Commenters without permission are ignored silently.
pub async fn add_method(
    platform: &dyn PlatformService,
    event: &CommentEvent,
    command: &MethodCommand,
) -> Result<CommandAction> {
    let pr = &event.pr;
    if !platform
        .check_permission(&pr.owner, &pr.repo, &event.commenter)
        .await?
    {
        info!(%pr, commenter = %event.commenter, method = command.name, "ignoring method command");
        return Ok(CommandAction::Denied);
    }

    let labels = platform.get_labels(pr).await?;
    if labels.iter().any(|l| l == command.opposite_label) {
        platform
            .create_pr_comment(
                pr,
                &messages::method_conflict(
                    command.opposite_label,
                    command.opposite_name,
                    command.name,
                ),
            )
            .await?;
        return Ok(CommandAction::Refused);
    }

    platform.add_labels(pr, &[command.label.to_string()]).await?;
    Ok(CommandAction::LabelAdded(command.label.to_string()))
}

pub async fn remove_method(
    platform: &dyn PlatformService,
    event: &CommentEvent,
    command: &MethodCommand,
) -> Result<CommandAction> {
    let pr = &event.pr;
    if !platform
        .check_permission(&pr.owner, &pr.repo, &event.commenter)
        .await?
    {
        info!(%pr, commenter = %event.commenter, method = command.name, "ignoring method command");
        return Ok(CommandAction::Denied);
    }

    let removed = remove_present(platform, pr, &[command.label.to_string()]).await?;
    Ok(CommandAction::LabelsRemoved(removed))
}
