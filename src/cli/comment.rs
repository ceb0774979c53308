//! Comment command - dispatch the slash commands in a PR comment

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use merge_gate::commands::{CommandAction, handle_comment};
use merge_gate::error::Result;
use merge_gate::types::CommentEvent;

/// Run the comment command
#[allow(clippy::future_not_send)]
pub async fn run_comment(
    ctx: &CommandContext,
    author: String,
    commenter: String,
    body: String,
) -> Result<()> {
    let event = CommentEvent {
        pr: ctx.pr.clone(),
        author,
        commenter,
        body,
    };

    let reports = handle_comment(ctx.platform.as_ref(), &ctx.policy, &event).await?;
    if reports.is_empty() {
        println!("{}", "No commands found in comment.".muted());
        return Ok(());
    }

    for report in reports {
        let command = report.command.to_string();
        match report.action {
            CommandAction::LabelAdded(label) => {
                println!("{} {}: added {}", check(), command.emphasis(), label.accent());
            }
            CommandAction::LabelsRemoved(labels) if labels.is_empty() => {
                println!("{} {}: nothing to remove", check(), command.emphasis());
            }
            CommandAction::LabelsRemoved(labels) => {
                println!(
                    "{} {}: removed {}",
                    check(),
                    command.emphasis(),
                    labels.join(", ").accent()
                );
            }
            CommandAction::Denied => {
                println!("{} {}: {}", cross(), command.emphasis(), "permission denied".warn());
            }
            CommandAction::Refused => {
                println!("{} {}: {}", cross(), command.emphasis(), "refused".warn());
            }
            CommandAction::Merged(outcome) => {
                println!(
                    "{} {}: merged {} with {}",
                    check(),
                    command.emphasis(),
                    outcome.pr.accent(),
                    outcome.method.accent()
                );
            }
            CommandAction::MergeBlocked(reason) => {
                println!("{} {}: {}", cross(), command.emphasis(), "not merged".warn());
                for line in reason.lines().filter(|l| !l.trim().is_empty()) {
                    println!("    {}", line.muted());
                }
            }
        }
    }
    Ok(())
}
