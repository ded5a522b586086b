//! Repository-host adapter.
//!
//! The [`RepoHost`] trait decouples orchestration from the hosting service
//! (currently the GitHub REST API plus local `git` for the push). Tests use
//! scripted hosts that record calls without touching the network.

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::io::git::Git;

/// A freshly created remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub html_url: String,
    pub clone_url: String,
}

/// Abstraction over source-control hosting.
pub trait RepoHost {
    /// Create a repository for the authenticated user.
    fn create_repository(&self, name: &str, description: &str) -> Result<RemoteRepo>;
    /// Publish the fixed local directory to the repository.
    fn publish(&self, site_dir: &Path, repo: &RemoteRepo) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct CreateRepoRequest<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
}

#[derive(Debug, Deserialize)]
struct CreateRepoResponse {
    html_url: String,
    clone_url: String,
}

/// Host implementation backed by the GitHub REST API.
pub struct GitHub {
    client: Client,
    api_url: String,
    token: String,
    private: bool,
}

impl GitHub {
    pub fn new(api_url: String, token: String, private: bool, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            api_url,
            token,
            private,
        })
    }
}

impl RepoHost for GitHub {
    #[instrument(skip_all, fields(name))]
    fn create_repository(&self, name: &str, description: &str) -> Result<RemoteRepo> {
        let url = format!("{}/user/repos", self.api_url.trim_end_matches('/'));
        debug!(url = %url, "creating repository");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", concat!("deckhand/", env!("CARGO_PKG_VERSION")))
            .json(&CreateRepoRequest {
                name,
                description,
                private: self.private,
            })
            .send()
            .context("send repository creation request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!(
                "repository creation failed with status {status}: {}",
                body.trim()
            ));
        }

        let created: CreateRepoResponse = response
            .json()
            .context("parse repository creation response")?;
        info!(html_url = %created.html_url, "repository created");
        Ok(RemoteRepo {
            html_url: created.html_url,
            clone_url: created.clone_url,
        })
    }

    #[instrument(skip_all, fields(site_dir = %site_dir.display()))]
    fn publish(&self, site_dir: &Path, repo: &RemoteRepo) -> Result<()> {
        if !site_dir.is_dir() {
            return Err(anyhow!(
                "site directory {} does not exist",
                site_dir.display()
            ));
        }
        info!(clone_url = %repo.clone_url, "publishing site directory");

        let git = Git::new(site_dir);
        git.init()?;
        git.add_all()?;
        git.commit("Initial commit")?;
        git.set_remote_origin(&repo.clone_url)?;
        git.rename_branch_main()?;
        git.push_upstream_main()?;

        debug!("site directory published");
        Ok(())
    }
}
