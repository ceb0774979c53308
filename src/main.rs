//! merge-gate CLI

mod cli;

use clap::{Parser, Subcommand};
use cli::style::Stylize;
use cli::{CheckOptions, CommandContext, GlobalOptions};
use merge_gate::error::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "merge-gate")]
#[command(about = "Label-driven merge gating for GitHub and GitLab pull requests")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read the forge token from this file
    #[arg(long, global = true)]
    token_path: Option<PathBuf>,

    /// Delete the token file after reading it
    #[arg(long, global = true, requires = "token_path")]
    delete_token: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a PR against its merge policy and merge it when ready
    Check {
        /// Repository as owner/repo
        repo: String,

        /// PR number
        number: u64,

        /// Show what would happen without merging
        #[arg(long)]
        dry_run: bool,

        /// Show the plan and ask before merging
        #[arg(long, short = 'i')]
        confirm: bool,
    },

    /// Handle slash commands in a PR comment
    Comment {
        /// Repository as owner/repo
        repo: String,

        /// PR number
        number: u64,

        /// Login of the PR author
        #[arg(long)]
        author: String,

        /// Login of the commenter
        #[arg(long)]
        commenter: String,

        /// Comment body
        #[arg(long)]
        body: String,
    },

    /// Remove review labels after new commits or a reopen
    Clear {
        /// Repository as owner/repo
        repo: String,

        /// PR number
        number: u64,

        /// The PR was reopened rather than updated
        #[arg(long)]
        reopened: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate the configuration file
    Validate,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "merge_gate=debug" } else { "merge_gate=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            anstream::eprintln!("{} {e}", "Error:".warn());
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> Result<()> {
    let options = GlobalOptions {
        config: cli.config,
        token_path: cli.token_path,
        delete_token: cli.delete_token,
    };

    match cli.command {
        Commands::Check {
            repo,
            number,
            dry_run,
            confirm,
        } => {
            let ctx = CommandContext::new(&options, &repo, number)?;
            cli::run_check(&ctx, CheckOptions { dry_run, confirm }).await
        }
        Commands::Comment {
            repo,
            number,
            author,
            commenter,
            body,
        } => {
            let ctx = CommandContext::new(&options, &repo, number)?;
            cli::run_comment(&ctx, author, commenter, body).await
        }
        Commands::Clear {
            repo,
            number,
            reopened,
        } => {
            let ctx = CommandContext::new(&options, &repo, number)?;
            cli::run_clear(&ctx, reopened).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate => cli::run_validate(&options),
        },
    }
}
