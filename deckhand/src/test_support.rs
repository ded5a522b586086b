//! Test-only scripted fakes for the external-collaborator seams.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

use crate::io::copilot::Analyst;
use crate::io::github::{RemoteRepo, RepoHost};
use crate::io::pulumi::{DeployOutputs, NewProjectRequest, StackEngine, StackRequest};

/// Stack engine that records requests and returns scripted outcomes.
#[derive(Default)]
pub struct ScriptedStackEngine {
    pub new_project_calls: RefCell<Vec<NewProjectRequest>>,
    pub deploy_calls: RefCell<Vec<StackRequest>>,
    pub destroy_calls: RefCell<Vec<StackRequest>>,
    new_project_error: Option<String>,
    deploy_error: Option<String>,
    destroy_error: Option<String>,
    deploy_outputs: Option<Map<String, Value>>,
}

impl ScriptedStackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_new_project(mut self, message: &str) -> Self {
        self.new_project_error = Some(message.to_string());
        self
    }

    pub fn failing_deploy(mut self, message: &str) -> Self {
        self.deploy_error = Some(message.to_string());
        self
    }

    pub fn failing_destroy(mut self, message: &str) -> Self {
        self.destroy_error = Some(message.to_string());
        self
    }

    pub fn with_outputs(mut self, outputs: Map<String, Value>) -> Self {
        self.deploy_outputs = Some(outputs);
        self
    }
}

impl StackEngine for ScriptedStackEngine {
    fn new_project(&self, request: &NewProjectRequest) -> Result<()> {
        self.new_project_calls.borrow_mut().push(request.clone());
        match &self.new_project_error {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(()),
        }
    }

    fn deploy(&self, request: &StackRequest) -> Result<DeployOutputs> {
        self.deploy_calls.borrow_mut().push(request.clone());
        match &self.deploy_error {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(DeployOutputs {
                outputs: self.deploy_outputs.clone(),
            }),
        }
    }

    fn destroy(&self, request: &StackRequest) -> Result<()> {
        self.destroy_calls.borrow_mut().push(request.clone());
        match &self.destroy_error {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(()),
        }
    }
}

/// Repository host that records calls without touching the network.
pub struct ScriptedRepoHost {
    /// (name, description) of repositories asked for.
    pub created: RefCell<Vec<(String, String)>>,
    pub published: RefCell<Vec<PathBuf>>,
    create_error: Option<String>,
    publish_error: Option<String>,
    repo: RemoteRepo,
}

impl ScriptedRepoHost {
    pub fn new() -> Self {
        Self {
            created: RefCell::new(Vec::new()),
            published: RefCell::new(Vec::new()),
            create_error: None,
            publish_error: None,
            repo: RemoteRepo {
                html_url: "https://github.com/me/my-site".to_string(),
                clone_url: "https://github.com/me/my-site.git".to_string(),
            },
        }
    }

    pub fn failing_create(mut self, message: &str) -> Self {
        self.create_error = Some(message.to_string());
        self
    }

    pub fn failing_publish(mut self, message: &str) -> Self {
        self.publish_error = Some(message.to_string());
        self
    }
}

impl Default for ScriptedRepoHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoHost for ScriptedRepoHost {
    fn create_repository(&self, name: &str, description: &str) -> Result<RemoteRepo> {
        self.created
            .borrow_mut()
            .push((name.to_string(), description.to_string()));
        match &self.create_error {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(self.repo.clone()),
        }
    }

    fn publish(&self, site_dir: &Path, _repo: &RemoteRepo) -> Result<()> {
        self.published.borrow_mut().push(site_dir.to_path_buf());
        match &self.publish_error {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(()),
        }
    }
}

/// Analyst that records the projects it was asked about.
pub struct ScriptedAnalyst {
    pub calls: RefCell<Vec<String>>,
    response: Result<String, String>,
}

impl ScriptedAnalyst {
    pub fn with_text(text: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            response: Ok(text.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            response: Err(message.to_string()),
        }
    }
}

impl Analyst for ScriptedAnalyst {
    fn analyze(&self, _project_dir: &Path, project: &str) -> Result<String> {
        self.calls.borrow_mut().push(project.to_string());
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(anyhow!("{msg}")),
        }
    }
}
