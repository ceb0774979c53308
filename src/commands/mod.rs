//! PR comment commands
//!
//! Comments are scanned for whole-line slash commands (`/lgtm`, `/approve`,
//! `/rebase`, `/squash`, their `cancel` variants, and `/check-pr`). Each
//! command found is dispatched in table order against the forge.

mod cleanup;
mod messages;
mod method;
mod review;

pub use cleanup::{ClearReason, clear_review_labels};

use crate::config::RepoPolicy;
use crate::error::Result;
use crate::merge::{MergeOutcome, failure_comment, run_merge_gate};
use crate::platform::PlatformService;
use crate::types::{CommentEvent, PrRef};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

/// A recognised comment command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `/lgtm`
    Lgtm,
    /// `/lgtm cancel`
    LgtmCancel,
    /// `/approve`
    Approve,
    /// `/approve cancel`
    ApproveCancel,
    /// `/rebase`
    Rebase,
    /// `/rebase cancel`
    RebaseCancel,
    /// `/squash`
    Squash,
    /// `/squash cancel`
    SquashCancel,
    /// `/check-pr`
    CheckPr,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Lgtm => "/lgtm",
            Self::LgtmCancel => "/lgtm cancel",
            Self::Approve => "/approve",
            Self::ApproveCancel => "/approve cancel",
            Self::Rebase => "/rebase",
            Self::RebaseCancel => "/rebase cancel",
            Self::Squash => "/squash",
            Self::SquashCancel => "/squash cancel",
            Self::CheckPr => "/check-pr",
        };
        f.write_str(s)
    }
}

const PATTERNS: &[(CommandKind, &str)] = &[
    (CommandKind::Lgtm, r"(?mi)^/lgtm\s*$"),
    (CommandKind::LgtmCancel, r"(?mi)^/lgtm cancel\s*$"),
    (CommandKind::Approve, r"(?mi)^/approve\s*$"),
    (CommandKind::ApproveCancel, r"(?mi)^/approve cancel\s*$"),
    (CommandKind::Rebase, r"(?mi)^/rebase\s*$"),
    (CommandKind::RebaseCancel, r"(?mi)^/rebase cancel\s*$"),
    (CommandKind::Squash, r"(?mi)^/squash\s*$"),
    (CommandKind::SquashCancel, r"(?mi)^/squash cancel\s*$"),
    (CommandKind::CheckPr, r"(?mi)^/check-pr\s*$"),
];

static COMMANDS: LazyLock<Vec<(CommandKind, Regex)>> = LazyLock::new(|| {
    PATTERNS
        .iter()
        .filter_map(|(kind, pattern)| Regex::new(pattern).ok().map(|re| (*kind, re)))
        .collect()
});

/// Every command present in `body`, in table order
pub fn parse_commands(body: &str) -> Vec<CommandKind> {
    COMMANDS
        .iter()
        .filter(|(_, re)| re.is_match(body))
        .map(|(kind, _)| *kind)
        .collect()
}

/// What a command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    /// A label was attached
    LabelAdded(String),
    /// Labels were detached (possibly none were present)
    LabelsRemoved(Vec<String>),
    /// The commenter lacks permission
    Denied,
    /// The command was refused (self review, conflicting method label)
    Refused,
    /// `/check-pr` merged the PR
    Merged(MergeOutcome),
    /// `/check-pr` could not merge; the explanation was posted
    MergeBlocked(String),
}

/// Result of one dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    /// The command
    pub command: CommandKind,
    /// What happened
    pub action: CommandAction,
}

/// Handle a PR comment: dispatch every command it contains
///
/// Stops at the first transport error. Earlier commands' effects stay.
pub async fn handle_comment(
    platform: &dyn PlatformService,
    policy: &RepoPolicy,
    event: &CommentEvent,
) -> Result<Vec<CommandReport>> {
    let commands = parse_commands(&event.body);
    if commands.is_empty() {
        debug!(pr = %event.pr, "no commands in comment");
        return Ok(Vec::new());
    }

    let mut reports = Vec::with_capacity(commands.len());
    for command in commands {
        info!(pr = %event.pr, %command, commenter = %event.commenter, "handling command");
        let action = match command {
            CommandKind::Lgtm => review::add_lgtm(platform, policy, event).await?,
            CommandKind::LgtmCancel => review::remove_lgtm(platform, policy, event).await?,
            CommandKind::Approve => review::add_approve(platform, event).await?,
            CommandKind::ApproveCancel => review::remove_approve(platform, event).await?,
            CommandKind::Rebase => method::add_method(platform, event, &method::REBASE).await?,
            CommandKind::RebaseCancel => {
                method::remove_method(platform, event, &method::REBASE).await?
            }
            CommandKind::Squash => method::add_method(platform, event, &method::SQUASH).await?,
            CommandKind::SquashCancel => {
                method::remove_method(platform, event, &method::SQUASH).await?
            }
            CommandKind::CheckPr => check_pr(platform, policy, &event.pr).await?,
        };
        debug!(pr = %event.pr, %command, ?action, "command handled");
        reports.push(CommandReport { command, action });
    }
    Ok(reports)
}

/// Run the merge gate and post policy or merge failures on the PR
///
/// Transport failures are returned so the caller can retry.
pub async fn check_pr(
    platform: &dyn PlatformService,
    policy: &RepoPolicy,
    pr: &PrRef,
) -> Result<CommandAction> {
    match run_merge_gate(platform, pr, policy).await {
        Ok(outcome) => Ok(CommandAction::Merged(outcome)),
        Err(e) => {
            let Some(body) = failure_comment(&e, policy) else {
                return Err(e);
            };
            platform.create_pr_comment(pr, &body).await?;
            Ok(CommandAction::MergeBlocked(e.to_string()))
        }
    }
}

/// Remove whichever of `wanted` are currently on the PR
async fn remove_present(
    platform: &dyn PlatformService,
    pr: &PrRef,
    wanted: &[String],
) -> Result<Vec<String>> {
    let current = platform.get_labels(pr).await?;
    let present: Vec<String> = wanted
        .iter()
        .filter(|w| current.contains(w))
        .cloned()
        .collect();
    if !present.is_empty() {
        platform.remove_labels(pr, &present).await?;
    }
    Ok(present)
}
