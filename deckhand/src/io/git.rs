//! Git adapter for publishing the fixed site directory.
//!
//! The assistant pushes one local directory to a freshly created remote, so
//! we keep a small, explicit wrapper around `git` subprocess calls. Each
//! call surfaces the trimmed stderr of a failing command verbatim.

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, instrument};

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Initialize a repository in the working directory (idempotent).
    #[instrument(skip_all)]
    pub fn init(&self) -> Result<()> {
        debug!(workdir = %self.workdir.display(), "git init");
        self.run_checked(&["init"])?;
        Ok(())
    }

    /// Stage all changes (respects .gitignore).
    pub fn add_all(&self) -> Result<()> {
        self.run_checked(&["add", "."])?;
        Ok(())
    }

    /// Commit staged changes with a message.
    #[instrument(skip_all)]
    pub fn commit(&self, message: &str) -> Result<()> {
        debug!("committing staged changes");
        self.run_checked(&["commit", "-m", message])?;
        Ok(())
    }

    /// Point `origin` at the given URL, replacing any existing remote.
    #[instrument(skip_all, fields(url))]
    pub fn set_remote_origin(&self, url: &str) -> Result<()> {
        let has_origin = self
            .run(&["remote", "get-url", "origin"])?
            .status
            .success();
        if has_origin {
            debug!("replacing existing origin remote");
            self.run_checked(&["remote", "set-url", "origin", url])?;
        } else {
            self.run_checked(&["remote", "add", "origin", url])?;
        }
        Ok(())
    }

    /// Force-rename the current branch to `main`.
    pub fn rename_branch_main(&self) -> Result<()> {
        self.run_checked(&["branch", "-M", "main"])?;
        Ok(())
    }

    /// Push `main` to origin and set the upstream.
    #[instrument(skip_all)]
    pub fn push_upstream_main(&self) -> Result<()> {
        debug!("pushing main to origin");
        self.run_checked(&["push", "-u", "origin", "main"])?;
        Ok(())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}
