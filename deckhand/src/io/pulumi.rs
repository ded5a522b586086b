//! Provisioning CLI adapter.
//!
//! The [`StackEngine`] trait decouples orchestration from the actual
//! provisioning backend (currently the `pulumi` CLI). Tests use scripted
//! engines that return predetermined outcomes without spawning processes.
//!
//! Command sequences are fixed, ordered argv lists. Any non-zero exit
//! status aborts the sequence and surfaces the captured stderr verbatim;
//! there is no retry and no rollback.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::io::process::run_command_with_timeout;

const SITE_INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Parameters for scaffolding a new project.
#[derive(Debug, Clone)]
pub struct NewProjectRequest {
    /// Directory the project is created in (created if missing).
    pub project_dir: PathBuf,
    /// Fully qualified `<org>/<project>/<stack>` reference.
    pub stack_ref: String,
    /// Provisioning template name.
    pub template: String,
}

/// Parameters for deploying or destroying an existing stack.
#[derive(Debug, Clone)]
pub struct StackRequest {
    pub project_dir: PathBuf,
    pub stack_ref: String,
    /// Cloud region for `config set azure-native:location`.
    pub location: String,
}

/// Stack outputs captured after a successful deployment.
///
/// `None` means the deployment succeeded but the output fetch did not; the
/// caller reports success without URLs in that case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployOutputs {
    pub outputs: Option<Map<String, Value>>,
}

/// Abstraction over provisioning backends.
pub trait StackEngine {
    /// Scaffold a new project from the fixed template.
    fn new_project(&self, request: &NewProjectRequest) -> Result<()>;
    /// Run the fixed deployment sequence.
    fn deploy(&self, request: &StackRequest) -> Result<DeployOutputs>;
    /// Run the fixed destruction sequence.
    fn destroy(&self, request: &StackRequest) -> Result<()>;
}

/// One external invocation within a fixed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceStep {
    pub program: String,
    pub args: Vec<String>,
}

impl SequenceStep {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Human-readable command line for logs and error messages.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Argv for `pulumi new` project scaffolding.
pub fn new_project_step(template: &str, stack_ref: &str) -> SequenceStep {
    SequenceStep::new(
        "pulumi",
        &["new", template, "-s", stack_ref, "--yes", "--force"],
    )
}

/// The fixed deployment sequence, in order.
pub fn deploy_sequence(stack_ref: &str, location: &str) -> Vec<SequenceStep> {
    vec![
        SequenceStep::new("pulumi", &["login"]),
        SequenceStep::new("go", &["mod", "tidy"]),
        SequenceStep::new("pulumi", &["stack", "select", stack_ref]),
        SequenceStep::new(
            "pulumi",
            &["config", "set", "azure-native:location", location],
        ),
        SequenceStep::new("pulumi", &["up", "--yes"]),
    ]
}

/// The fixed destruction sequence, in order.
pub fn destroy_sequence(stack_ref: &str) -> Vec<SequenceStep> {
    vec![
        SequenceStep::new("pulumi", &["login"]),
        SequenceStep::new("pulumi", &["stack", "select", stack_ref]),
        SequenceStep::new("pulumi", &["destroy", "--yes"]),
    ]
}

fn stack_output_step() -> SequenceStep {
    SequenceStep::new("pulumi", &["stack", "output", "--json"])
}

/// Engine that spawns the `pulumi` CLI (and `go` for module tidy).
pub struct PulumiCli {
    /// Credential environment passed to every child invocation.
    env: Vec<(String, String)>,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl PulumiCli {
    pub fn new(env: Vec<(String, String)>, timeout: Duration, output_limit_bytes: usize) -> Self {
        Self {
            env,
            timeout,
            output_limit_bytes,
        }
    }

    fn run_step(&self, workdir: &Path, step: &SequenceStep) -> Result<String> {
        debug!(command = %step.display(), workdir = %workdir.display(), "running sequence step");
        let mut cmd = Command::new(&step.program);
        cmd.args(&step.args)
            .current_dir(workdir)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let output = run_command_with_timeout(cmd, self.timeout, self.output_limit_bytes)
            .with_context(|| format!("spawn {}", step.display()))?;

        if output.timed_out {
            warn!(command = %step.display(), "sequence step timed out");
            return Err(anyhow!(
                "{} timed out after {:?}",
                step.display(),
                self.timeout
            ));
        }
        if !output.status.success() {
            warn!(command = %step.display(), exit_code = ?output.status.code(), "sequence step failed");
            return Err(anyhow!(
                "{} failed: {}",
                step.display(),
                output.stderr_text()
            ));
        }
        Ok(output.stdout_text())
    }

    fn run_sequence(&self, workdir: &Path, steps: &[SequenceStep]) -> Result<()> {
        for step in steps {
            self.run_step(workdir, step)?;
        }
        Ok(())
    }
}

impl StackEngine for PulumiCli {
    #[instrument(skip_all, fields(stack_ref = %request.stack_ref))]
    fn new_project(&self, request: &NewProjectRequest) -> Result<()> {
        info!(project_dir = %request.project_dir.display(), "scaffolding project");
        fs::create_dir_all(&request.project_dir).with_context(|| {
            format!("create project directory {}", request.project_dir.display())
        })?;

        let step = new_project_step(&request.template, &request.stack_ref);
        self.run_step(&request.project_dir, &step)?;

        // The template ships a stock page; replace it with ours.
        let www_dir = request.project_dir.join("www");
        fs::create_dir_all(&www_dir)
            .with_context(|| format!("create {}", www_dir.display()))?;
        let index_path = www_dir.join("index.html");
        fs::write(&index_path, SITE_INDEX_HTML)
            .with_context(|| format!("write {}", index_path.display()))?;

        debug!("project scaffolded");
        Ok(())
    }

    #[instrument(skip_all, fields(stack_ref = %request.stack_ref))]
    fn deploy(&self, request: &StackRequest) -> Result<DeployOutputs> {
        info!(project_dir = %request.project_dir.display(), "deploying stack");
        let steps = deploy_sequence(&request.stack_ref, &request.location);
        self.run_sequence(&request.project_dir, &steps)?;

        // Best-effort: a failing output fetch degrades to "no URLs", it does
        // not fail the deployment.
        let outputs = match self.run_step(&request.project_dir, &stack_output_step()) {
            Ok(raw) => match serde_json::from_str::<Map<String, Value>>(&raw) {
                Ok(map) => Some(map),
                Err(err) => {
                    warn!(err = %err, "could not parse stack outputs");
                    None
                }
            },
            Err(err) => {
                warn!(err = %err, "could not fetch stack outputs");
                None
            }
        };

        info!("stack deployed");
        Ok(DeployOutputs { outputs })
    }

    #[instrument(skip_all, fields(stack_ref = %request.stack_ref))]
    fn destroy(&self, request: &StackRequest) -> Result<()> {
        info!(project_dir = %request.project_dir.display(), "destroying stack");
        let steps = destroy_sequence(&request.stack_ref);
        self.run_sequence(&request.project_dir, &steps)?;
        info!("stack destroyed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_step_pins_template_and_stack() {
        let step = new_project_step("static-website-azure-go", "acme/my-site/dev");
        assert_eq!(
            step.display(),
            "pulumi new static-website-azure-go -s acme/my-site/dev --yes --force"
        );
    }

    #[test]
    fn deploy_sequence_is_fixed_and_ordered() {
        let steps = deploy_sequence("acme/my-site/dev", "eastus");
        let rendered: Vec<String> = steps.iter().map(SequenceStep::display).collect();
        assert_eq!(
            rendered,
            vec![
                "pulumi login",
                "go mod tidy",
                "pulumi stack select acme/my-site/dev",
                "pulumi config set azure-native:location eastus",
                "pulumi up --yes",
            ]
        );
    }

    #[test]
    fn destroy_sequence_is_fixed_and_ordered() {
        let steps = destroy_sequence("acme/my-site/dev");
        let rendered: Vec<String> = steps.iter().map(SequenceStep::display).collect();
        assert_eq!(
            rendered,
            vec![
                "pulumi login",
                "pulumi stack select acme/my-site/dev",
                "pulumi destroy --yes",
            ]
        );
    }

    #[test]
    fn failed_step_surfaces_stderr_verbatim() {
        let cli = PulumiCli::new(Vec::new(), Duration::from_secs(5), 1000);
        let temp = tempfile::tempdir().expect("tempdir");
        let step = SequenceStep::new("sh", &["-c", "echo scaffolding broke >&2; exit 3"]);

        let err = cli.run_step(temp.path(), &step).unwrap_err();
        assert!(err.to_string().contains("scaffolding broke"));
    }

    #[test]
    fn sequence_aborts_on_first_failure() {
        let cli = PulumiCli::new(Vec::new(), Duration::from_secs(5), 1000);
        let temp = tempfile::tempdir().expect("tempdir");
        let marker = temp.path().join("ran-second-step");
        let touch = format!("touch {}", marker.display());
        let steps = vec![
            SequenceStep::new("sh", &["-c", "exit 1"]),
            SequenceStep::new("sh", &["-c", &touch]),
        ];

        assert!(cli.run_sequence(temp.path(), &steps).is_err());
        assert!(!marker.exists());
    }
}
