//! Orchestration for the fixed deployment sequence.
//!
//! Deployment publishes the fixed site directory to a freshly created
//! repository, then runs the provisioning sequence. Any failing step aborts
//! the sequence; there is no rollback of steps already taken.

use std::path::Path;

use anyhow::Result;
use tracing::{info, instrument};

use crate::core::project::SiteSpec;
use crate::io::config::AssistantConfig;
use crate::io::github::RepoHost;
use crate::io::pulumi::{DeployOutputs, StackEngine, StackRequest};

/// Result of a completed deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOutcome {
    /// Human-readable summaries of the steps taken, in order.
    pub steps: Vec<String>,
    pub outputs: DeployOutputs,
}

/// Create the repository, publish the site directory, and deploy the stack.
#[instrument(skip_all, fields(project = %spec.name))]
pub fn deploy_site<S: StackEngine, R: RepoHost>(
    root: &Path,
    engine: &S,
    host: &R,
    cfg: &AssistantConfig,
    spec: &SiteSpec,
) -> Result<DeployOutcome> {
    let mut steps = Vec::new();

    let repo = host.create_repository(&spec.name, &spec.description)?;
    steps.push(format!("Created repository: {}", repo.html_url));

    let site_dir = root.join(&cfg.site_dir);
    host.publish(&site_dir, &repo)?;
    steps.push(format!("Pushed {} to {}", cfg.site_dir, repo.html_url));

    let outputs = engine.deploy(&StackRequest {
        project_dir: root.join(&spec.name),
        stack_ref: cfg.stack_ref(&spec.name),
        location: cfg.location.clone(),
    })?;
    steps.push(format!("Deployed stack {}", cfg.stack_ref(&spec.name)));

    info!(steps = steps.len(), "deployment finished");
    Ok(DeployOutcome { steps, outputs })
}
