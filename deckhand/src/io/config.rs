//! Assistant configuration stored under `.deckhand/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Assistant configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to the template's stock values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AssistantConfig {
    /// Provisioning-service organization owning the stacks.
    pub org: String,

    /// Stack name within `<org>/<project>/<stack>`.
    pub stack: String,

    /// Cloud region passed to `config set azure-native:location`.
    pub location: String,

    /// Provisioning template used by `pulumi new`.
    pub template: String,

    /// Fixed local directory pushed to the repository host on deploy.
    pub site_dir: String,

    /// Directory where analysis markdown files are written.
    pub analysis_dir: String,

    /// Per-command wall-clock budget in seconds for external CLI calls.
    pub command_timeout_secs: u64,

    /// Truncate captured subprocess stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,

    pub api: ApiConfig,
    pub github: GithubConfig,
}

/// Provisioning-service API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Repository-host API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    /// Create repositories as private.
    pub private: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.pulumi.com".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            private: true,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            org: "personal".to_string(),
            stack: "dev".to_string(),
            location: "eastus".to_string(),
            template: "static-website-azure-go".to_string(),
            site_dir: "site".to_string(),
            analysis_dir: "analysis".to_string(),
            command_timeout_secs: 10 * 60,
            output_limit_bytes: 100_000,
            api: ApiConfig::default(),
            github: GithubConfig::default(),
        }
    }
}

impl AssistantConfig {
    pub fn validate(&self) -> Result<()> {
        if self.org.trim().is_empty() {
            return Err(anyhow!("org must not be empty"));
        }
        if self.stack.trim().is_empty() {
            return Err(anyhow!("stack must not be empty"));
        }
        if self.template.trim().is_empty() {
            return Err(anyhow!("template must not be empty"));
        }
        if self.command_timeout_secs == 0 {
            return Err(anyhow!("command_timeout_secs must be > 0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.api.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Fully qualified stack reference for a project slug.
    pub fn stack_ref(&self, project: &str) -> String {
        format!("{}/{}/{}", self.org, project, self.stack)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AssistantConfig::default()`.
pub fn load_config(path: &Path) -> Result<AssistantConfig> {
    if !path.exists() {
        let cfg = AssistantConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AssistantConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &AssistantConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
