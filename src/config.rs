//! Repository policy configuration loaded from `config.toml`.

use crate::error::{Error, Result};
use crate::types::{MergeMethod, Platform, PlatformConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name for merge-gate within the user config dir.
const CONFIG_DIR: &str = "merge-gate";

/// Filename for the configuration file.
const CONFIG_FILE: &str = "config.toml";

fn default_lgtm_counts() -> u32 {
    1
}

fn default_merge_method() -> String {
    MergeMethod::Merge.to_string()
}

/// Merge policy for the repositories in its scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPolicy {
    /// `org` or `org/repo` entries this policy applies to
    #[serde(default)]
    pub scope: Vec<String>,

    /// `org` or `org/repo` entries excluded from `scope`
    #[serde(default)]
    pub excluded: Vec<String>,

    /// The only identity whose label additions count as legitimate
    #[serde(default)]
    pub legal_operator: String,

    /// Number of review labels required. Above 1, each reviewer gets an
    /// `lgtm-<login>` label instead of the shared `lgtm` label.
    #[serde(default = "default_lgtm_counts")]
    pub lgtm_counts_required: u32,

    /// Labels, besides approval and review labels, that must be present
    #[serde(default)]
    pub labels_for_merge: Vec<String>,

    /// Labels that veto the merge outright
    #[serde(default)]
    pub labels_not_allow_merge: Vec<String>,

    /// Merge method used when no `merge/<method>` label is present
    #[serde(default = "default_merge_method")]
    pub merge_method: String,
}

impl Default for RepoPolicy {
    fn default() -> Self {
        Self {
            scope: Vec::new(),
            excluded: Vec::new(),
            legal_operator: String::new(),
            lgtm_counts_required: default_lgtm_counts(),
            labels_for_merge: Vec::new(),
            labels_not_allow_merge: Vec::new(),
            merge_method: default_merge_method(),
        }
    }
}

impl RepoPolicy {
    /// Policy with the given legal operator and defaults elsewhere
    pub fn new(legal_operator: impl Into<String>) -> Self {
        Self {
            legal_operator: legal_operator.into(),
            ..Self::default()
        }
    }

    /// Default merge method for this policy
    pub fn default_merge_method(&self) -> MergeMethod {
        if self.merge_method.trim().is_empty() {
            MergeMethod::default()
        } else {
            MergeMethod::from_name(&self.merge_method)
        }
    }

    /// Whether the policy covers `owner/repo`
    pub fn applies_to(&self, owner: &str, repo: &str) -> bool {
        let full = format!("{owner}/{repo}");
        let listed = |entries: &[String]| entries.iter().any(|e| e == owner || *e == full);
        listed(self.scope.as_slice()) && !listed(self.excluded.as_slice())
    }

    fn validate(&self, index: usize) -> Result<()> {
        let at = |msg: &str| Error::Config(format!("policy #{}: {msg}", index + 1));

        if self.scope.is_empty() {
            return Err(at("the repositories configuration can not be empty"));
        }
        if let Some(entry) = self.scope.iter().find(|e| self.excluded.contains(e)) {
            return Err(at(&format!("{entry} exists in both scope and excluded")));
        }
        if self.legal_operator.trim().is_empty() {
            return Err(at("legal_operator must be set"));
        }
        if self.lgtm_counts_required == 0 {
            return Err(at("lgtm_counts_required must be at least 1"));
        }
        if self.merge_method.trim().is_empty() {
            return Err(at("merge_method can not be empty"));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Forge the policies apply to
    #[serde(default)]
    pub platform: Platform,

    /// Custom host (None for github.com/gitlab.com)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Policies, matched in order
    #[serde(default, rename = "policy")]
    pub policies: Vec<RepoPolicy>,
}

impl Config {
    /// Load and validate configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        Self::parse(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every policy
    pub fn validate(&self) -> Result<()> {
        for (i, policy) in self.policies.iter().enumerate() {
            policy.validate(i)?;
        }
        Ok(())
    }

    /// First policy covering `owner/repo`
    pub fn policy_for(&self, owner: &str, repo: &str) -> Result<&RepoPolicy> {
        self.policies
            .iter()
            .find(|p| p.applies_to(owner, repo))
            .ok_or_else(|| Error::NoPolicy {
                owner: owner.to_string(),
                repo: repo.to_string(),
            })
    }

    /// Platform settings for creating a platform service
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            platform: self.platform,
            host: self.host.clone(),
        }
    }
}

/// Default configuration path: `<config dir>/merge-gate/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))
}
