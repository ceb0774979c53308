//! Platform service factory

use crate::error::Result;
use crate::platform::{GitHubService, GitLabService, PlatformService};
use crate::types::{Platform, PlatformConfig};
use tracing::debug;

/// Create a platform service for the configured forge
pub fn create_platform_service(
    config: &PlatformConfig,
    token: &str,
) -> Result<Box<dyn PlatformService>> {
    debug!(platform = %config.platform, host = ?config.host, "creating platform service");
    match config.platform {
        Platform::GitHub => Ok(Box::new(GitHubService::new(token, config.host.clone())?)),
        Platform::GitLab => Ok(Box::new(GitLabService::new(
            token.to_string(),
            config.host.clone(),
        )?)),
    }
}
