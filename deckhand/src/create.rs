//! Orchestration for creating a new static-website project.
//!
//! Creation scaffolds the project from the fixed template, then asks the
//! analysis endpoint to review the generated program and persists the
//! analysis as a markdown artifact. Analysis and artifact failures degrade:
//! the project still exists and the caller still asks about deployment.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::io::analysis::save_analysis;
use crate::io::config::AssistantConfig;
use crate::io::copilot::Analyst;
use crate::io::pulumi::{NewProjectRequest, StackEngine};

/// How the post-creation analysis went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Analysis text received and written to disk.
    Saved { text: String, path: PathBuf },
    /// Analysis text received but the artifact write failed.
    Unsaved { text: String, error: String },
    /// The analysis request itself failed.
    Failed { error: String },
}

/// Result of a successful project creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub project: String,
    pub analysis: AnalysisOutcome,
}

/// Scaffold `project` under `root` and analyze the generated program.
///
/// Fails only when the scaffold itself fails; analysis trouble is reported
/// through [`AnalysisOutcome`].
#[instrument(skip_all, fields(project))]
pub fn create_site<S: StackEngine, A: Analyst>(
    root: &Path,
    engine: &S,
    analyst: &A,
    cfg: &AssistantConfig,
    project: &str,
) -> Result<CreateOutcome> {
    let project_dir = root.join(project);
    engine.new_project(&NewProjectRequest {
        project_dir: project_dir.clone(),
        stack_ref: cfg.stack_ref(project),
        template: cfg.template.clone(),
    })?;
    info!(project_dir = %project_dir.display(), "project created");

    let analysis = match analyst.analyze(&project_dir, project) {
        Ok(text) => {
            let analysis_dir = root.join(&cfg.analysis_dir);
            match save_analysis(&analysis_dir, project, &text, Utc::now()) {
                Ok(path) => AnalysisOutcome::Saved { text, path },
                Err(err) => {
                    warn!(err = format!("{err:#}"), "analysis artifact write failed");
                    AnalysisOutcome::Unsaved {
                        text,
                        error: format!("{err:#}"),
                    }
                }
            }
        }
        Err(err) => {
            warn!(err = format!("{err:#}"), "analysis failed");
            AnalysisOutcome::Failed {
                error: format!("{err:#}"),
            }
        }
    };

    Ok(CreateOutcome {
        project: project.to_string(),
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::AssistantConfig;
    use crate::test_support::{ScriptedAnalyst, ScriptedStackEngine};

    fn cfg() -> AssistantConfig {
        AssistantConfig {
            org: "acme".to_string(),
            ..AssistantConfig::default()
        }
    }

    #[test]
    fn creates_project_and_saves_analysis() {
        let temp = tempfile::tempdir().expect("tempdir");
        let engine = ScriptedStackEngine::new();
        let analyst = ScriptedAnalyst::with_text("Looks solid.");

        let outcome =
            create_site(temp.path(), &engine, &analyst, &cfg(), "my-site").expect("create");

        let requests = engine.new_project_calls.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].stack_ref, "acme/my-site/dev");
        assert_eq!(requests[0].template, "static-website-azure-go");

        match &outcome.analysis {
            AnalysisOutcome::Saved { text, path } => {
                assert_eq!(text, "Looks solid.");
                assert!(path.is_file());
            }
            other => panic!("expected saved analysis, got {other:?}"),
        }
    }

    #[test]
    fn failed_analysis_still_returns_outcome() {
        let temp = tempfile::tempdir().expect("tempdir");
        let engine = ScriptedStackEngine::new();
        let analyst = ScriptedAnalyst::failing("endpoint unreachable");

        let outcome =
            create_site(temp.path(), &engine, &analyst, &cfg(), "my-site").expect("create");

        match &outcome.analysis {
            AnalysisOutcome::Failed { error } => assert!(error.contains("endpoint unreachable")),
            other => panic!("expected failed analysis, got {other:?}"),
        }
    }

    #[test]
    fn scaffold_failure_propagates() {
        let temp = tempfile::tempdir().expect("tempdir");
        let engine = ScriptedStackEngine::new().failing_new_project("pulumi new failed: boom");
        let analyst = ScriptedAnalyst::with_text("unused");

        let err = create_site(temp.path(), &engine, &analyst, &cfg(), "my-site").unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert!(analyst.calls.borrow().is_empty());
    }
}
