//! Preflight checks for configuration and credentials.
//!
//! `deckhand doctor` reports each requirement on its own line and fails if
//! any is missing, mirroring the fatal startup contract of `chat`.

use std::env;
use std::path::Path;

use anyhow::{bail, Result};

use crate::io::config::load_config;
use crate::io::credentials::{
    parse_azure_credentials, AZURE_CREDENTIALS_VAR, GITHUB_TOKEN_VAR, PULUMI_TOKEN_VAR,
};

/// One requirement and whether it is satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    pub label: String,
    pub ok: bool,
    pub detail: String,
}

/// Outcome of all preflight checks.
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub items: Vec<CheckItem>,
}

impl DoctorReport {
    pub fn all_ok(&self) -> bool {
        self.items.iter().all(|item| item.ok)
    }

    pub fn render(&self) -> String {
        let mut buf = String::new();
        for item in &self.items {
            let mark = if item.ok { "ok" } else { "MISSING" };
            buf.push_str(&format!("{:<24} {:<8} {}\n", item.label, mark, item.detail));
        }
        buf.trim_end().to_string()
    }
}

/// Run every preflight check against the environment and `root`.
pub fn check(root: &Path) -> DoctorReport {
    let mut items = Vec::new();

    let config_path = root.join(".deckhand").join("config.toml");
    items.push(match load_config(&config_path) {
        Ok(_) if config_path.exists() => item("config", true, config_path.display().to_string()),
        Ok(_) => item("config", true, "not present, using defaults".to_string()),
        Err(err) => item("config", false, format!("{err:#}")),
    });

    items.push(match env::var(AZURE_CREDENTIALS_VAR) {
        Ok(blob) => match parse_azure_credentials(&blob) {
            Ok(_) => item(AZURE_CREDENTIALS_VAR, true, "parsed".to_string()),
            Err(err) => item(AZURE_CREDENTIALS_VAR, false, format!("{err:#}")),
        },
        Err(_) => item(AZURE_CREDENTIALS_VAR, false, "not set".to_string()),
    });

    for var in [PULUMI_TOKEN_VAR, GITHUB_TOKEN_VAR] {
        items.push(match env::var(var) {
            Ok(_) => item(var, true, "set".to_string()),
            Err(_) => item(var, false, "not set".to_string()),
        });
    }

    DoctorReport { items }
}

/// Run the checks, print the report, and fail if anything is missing.
pub fn run(root: &Path) -> Result<()> {
    let report = check(root);
    println!("{}", report.render());
    if !report.all_ok() {
        bail!("preflight checks failed");
    }
    Ok(())
}

fn item(label: &str, ok: bool, detail: String) -> CheckItem {
    CheckItem {
        label: label.to_string(),
        ok,
        detail,
    }
}
