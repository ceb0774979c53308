//! Clear command - drop review labels after a code update or reopen

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use merge_gate::commands::{ClearReason, clear_review_labels};
use merge_gate::error::Result;

/// Run the clear command
#[allow(clippy::future_not_send)]
pub async fn run_clear(ctx: &CommandContext, reopened: bool) -> Result<()> {
    let reason = if reopened {
        ClearReason::Reopened
    } else {
        ClearReason::SourceUpdated
    };

    let removed = clear_review_labels(ctx.platform.as_ref(), &ctx.pr, reason).await?;
    if removed.is_empty() {
        println!("{}", "No review labels to clear.".muted());
    } else {
        println!(
            "{} Cleared {} on {}",
            check(),
            removed.join(", ").accent(),
            ctx.pr.emphasis()
        );
    }
    Ok(())
}
