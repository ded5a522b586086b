//! Orchestration for the fixed destruction sequence.

use std::path::Path;

use anyhow::Result;
use tracing::{info, instrument};

use crate::io::config::AssistantConfig;
use crate::io::pulumi::{StackEngine, StackRequest};

/// Tear down the project's stack.
///
/// The repository and local directories are left in place; only the cloud
/// resources are destroyed.
#[instrument(skip_all, fields(project))]
pub fn destroy_site<S: StackEngine>(
    root: &Path,
    engine: &S,
    cfg: &AssistantConfig,
    project: &str,
) -> Result<Vec<String>> {
    engine.destroy(&StackRequest {
        project_dir: root.join(project),
        stack_ref: cfg.stack_ref(project),
        location: cfg.location.clone(),
    })?;
    info!("destruction finished");
    Ok(vec![format!("Destroyed stack {}", cfg.stack_ref(project))])
}
