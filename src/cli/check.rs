//! Check command - run the merge gate for one PR

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross, spinner_style};
use anstream::println;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use merge_gate::error::{Error, Result};
use merge_gate::merge::{
    MergeDecision, MergePlan, create_merge_plan, execute_merge_plan, gather_merge_inputs,
};
use std::time::Duration;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Dry run - show the plan without merging
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before merging
    pub confirm: bool,
}

/// Run the check command
#[allow(clippy::future_not_send)]
pub async fn run_check(ctx: &CommandContext, options: CheckOptions) -> Result<()> {
    // Phase 1: GATHER
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Fetching labels for {}...", ctx.pr.emphasis()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let inputs = match gather_merge_inputs(ctx.platform.as_ref(), &ctx.pr).await {
        Ok(inputs) => inputs,
        Err(e) => {
            spinner.finish_with_message(format!("{} Failed to fetch {}", cross(), ctx.pr));
            return Err(e);
        }
    };
    spinner.finish_with_message(format!(
        "{} Fetched {} label(s) and {} log entries",
        check(),
        inputs.labels.len(),
        inputs.log.len()
    ));

    // Phase 2: PLAN
    let plan = create_merge_plan(&inputs, &ctx.policy);

    // Phase 3: EXECUTE
    if options.dry_run {
        report_plan(&plan);
        return Ok(());
    }

    if options.confirm {
        report_plan(&plan);
        if plan.is_mergeable()
            && !Confirm::new()
                .with_prompt("Proceed with merge?")
                .default(true)
                .interact()
                .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    if let MergeDecision::Merge(method) = &plan.decision {
        println!(
            "{} {} with {}...",
            "Merging".emphasis(),
            ctx.pr.accent(),
            method.accent()
        );
    }

    let outcome = execute_merge_plan(&plan, ctx.platform.as_ref()).await?;

    println!("{} Merged {}", check(), outcome.pr.accent());
    if let Some(sha) = &outcome.sha {
        println!("   Commit: {}", sha.muted());
    }
    Ok(())
}

/// Report the plan (dry run and confirmation)
fn report_plan(plan: &MergePlan) {
    println!("{}:", "Merge plan".emphasis());
    println!();

    match &plan.decision {
        MergeDecision::Merge(method) => {
            println!(
                "  {} {} using {}",
                "✓ Would merge".success(),
                plan.pr,
                method.accent()
            );
        }
        MergeDecision::Blocked(_) => {
            println!(
                "  {} {} (stopped after {})",
                "✗ Blocked".warn(),
                plan.pr,
                plan.reached.muted()
            );
            for reason in plan.reasons() {
                for line in reason.lines().filter(|l| !l.trim().is_empty()) {
                    println!("    - {}", line.muted());
                }
            }
        }
    }

    println!();
    if plan.is_mergeable() {
        println!("{}", "Run without --dry-run to merge.".muted());
    } else {
        println!("{}", "The PR is not ready to merge.".muted());
    }
}
