//! Config validate command

use crate::cli::context::{GlobalOptions, load_config};
use crate::cli::style::{Stylize, check};
use anstream::println;
use merge_gate::error::Result;

/// Load the configuration and summarise its policies
pub fn run_validate(options: &GlobalOptions) -> Result<()> {
    let path = options.config_path()?;
    let config = load_config(&path)?;

    let count = config.policies.len();
    let noun = if count == 1 { "policy" } else { "policies" };
    println!(
        "{} {} is valid ({} on {})",
        check(),
        path.display().emphasis(),
        format!("{count} {noun}").accent(),
        config.platform
    );
    for policy in &config.policies {
        println!(
            "  {} operator={} lgtm={} method={}",
            policy.scope.join(", ").accent(),
            policy.legal_operator,
            policy.lgtm_counts_required,
            policy.merge_method
        );
        if !policy.excluded.is_empty() {
            println!("    excluded: {}", policy.excluded.join(", ").muted());
        }
    }
    Ok(())
}
