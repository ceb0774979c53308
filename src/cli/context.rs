//! Shared command context for CLI commands
//!
//! Extracts the setup shared by check, comment and clear.

use merge_gate::auth::load_token;
use merge_gate::config::{Config, RepoPolicy, default_config_path};
use merge_gate::error::{Error, Result};
use merge_gate::platform::{PlatformService, create_platform_service};
use merge_gate::types::PrRef;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options every platform-facing command accepts
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// File holding the forge token
    pub token_path: Option<PathBuf>,
    /// Remove the token file once read
    pub delete_token: bool,
}

impl GlobalOptions {
    /// Configuration path, falling back to the user config directory
    pub fn config_path(&self) -> Result<PathBuf> {
        self.config.clone().map_or_else(default_config_path, Ok)
    }
}

/// Shared context for CLI commands that interact with the platform
///
/// This struct encapsulates the common setup:
/// - Loading and validating the configuration
/// - Selecting the policy covering the repository
/// - Resolving the token and creating the platform service
pub struct CommandContext {
    /// The PR being worked on
    pub pr: PrRef,
    /// Policy covering the PR's repository
    pub policy: RepoPolicy,
    /// Platform service (GitHub/GitLab)
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Create a new command context for `repo` (`owner/repo`) and `number`
    pub fn new(options: &GlobalOptions, repo: &str, number: u64) -> Result<Self> {
        let pr = PrRef::parse(repo, number).ok_or_else(|| {
            Error::Config(format!("invalid repository '{repo}', expected owner/repo"))
        })?;

        let config = load_config(&options.config_path()?)?;
        let policy = config.policy_for(&pr.owner, &pr.repo)?.clone();

        let platform_config = config.platform_config();
        let auth = load_token(
            platform_config.platform,
            options.token_path.as_deref(),
            options.delete_token,
        )?;
        debug!(source = ?auth.source, "resolved token");

        let platform = create_platform_service(&platform_config, &auth.token)?;

        Ok(Self {
            pr,
            policy,
            platform,
        })
    }
}

/// Load the configuration file; loading validates every policy
pub fn load_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading configuration");
    Config::load(path)
}
