//! Authentication for GitHub and GitLab
//!
//! Supports a token file (optionally deleted after reading) and environment
//! variables.

use crate::error::{Error, Result};
use crate::types::Platform;
use std::path::Path;
use tracing::{debug, warn};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token read from a file
    File,
    /// Token from environment variable
    EnvVar,
}

/// Resolved token and where it came from
#[derive(Clone)]
pub struct AuthToken {
    /// The token itself
    pub token: String,
    /// Where it was read from
    pub source: AuthSource,
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Environment variables consulted for `platform`, in order
pub const fn env_vars(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::GitHub => &["GITHUB_TOKEN", "GH_TOKEN"],
        Platform::GitLab => &["GITLAB_TOKEN"],
    }
}

/// Resolve the forge token
///
/// A `token_path` takes precedence over the environment. With `delete`, the
/// file is removed after a successful read; failure to remove it is logged.
pub fn load_token(
    platform: Platform,
    token_path: Option<&Path>,
    delete: bool,
) -> Result<AuthToken> {
    if let Some(path) = token_path {
        return read_token_file(path, delete);
    }
    token_from_env(platform, |name| std::env::var(name).ok())
}

fn read_token_file(path: &Path, delete: bool) -> Result<AuthToken> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Auth(format!("failed to read token file {}: {e}", path.display())))?;
    let token = content.trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth(format!("token file {} is empty", path.display())));
    }

    if delete {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "deleted token file"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to delete token file"),
        }
    }

    Ok(AuthToken {
        token,
        source: AuthSource::File,
    })
}

/// Resolve the token from environment variables via `lookup`
pub fn token_from_env<F>(platform: Platform, lookup: F) -> Result<AuthToken>
where
    F: Fn(&str) -> Option<String>,
{
    let vars = env_vars(platform);
    vars.iter()
        .find_map(|name| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .inspect(|_| debug!(var = *name, "using token from environment"))
        })
        .map(|token| AuthToken {
            token,
            source: AuthSource::EnvVar,
        })
        .ok_or_else(|| {
            Error::Auth(format!(
                "no {platform} token found; pass --token-path or set {}",
                vars.join(" or ")
            ))
        })
}
