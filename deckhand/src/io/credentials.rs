//! Startup environment contract for cloud and API credentials.
//!
//! All credentials are read once at startup; a missing variable is a fatal
//! error, not a recoverable condition. Child processes receive the cloud
//! credentials through their own environment rather than through mutation
//! of the parent's.

use std::env;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const AZURE_CREDENTIALS_VAR: &str = "AZURE_CREDENTIALS";
pub const PULUMI_TOKEN_VAR: &str = "PULUMI_ACCESS_TOKEN";
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Service-principal fields bundled as one JSON blob in `AZURE_CREDENTIALS`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AzureCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
}

/// Everything the assistant needs to talk to its collaborators.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub azure: AzureCredentials,
    pub pulumi_token: String,
    pub github_token: String,
}

impl Credentials {
    /// Read the full contract from the process environment.
    pub fn from_env() -> Result<Self> {
        let azure_blob = require_var(AZURE_CREDENTIALS_VAR)?;
        let azure = parse_azure_credentials(&azure_blob)?;
        let pulumi_token = require_var(PULUMI_TOKEN_VAR)?;
        let github_token = require_var(GITHUB_TOKEN_VAR)?;
        Ok(Self {
            azure,
            pulumi_token,
            github_token,
        })
    }

    /// Environment passed to every provisioning CLI invocation.
    pub fn child_env(&self) -> Vec<(String, String)> {
        vec![
            ("ARM_CLIENT_ID".to_string(), self.azure.client_id.clone()),
            (
                "ARM_CLIENT_SECRET".to_string(),
                self.azure.client_secret.clone(),
            ),
            ("ARM_TENANT_ID".to_string(), self.azure.tenant_id.clone()),
            (
                "ARM_SUBSCRIPTION_ID".to_string(),
                self.azure.subscription_id.clone(),
            ),
            (PULUMI_TOKEN_VAR.to_string(), self.pulumi_token.clone()),
        ]
    }
}

/// Parse the `AZURE_CREDENTIALS` JSON blob.
pub fn parse_azure_credentials(blob: &str) -> Result<AzureCredentials> {
    serde_json::from_str(blob).with_context(|| format!("parse {AZURE_CREDENTIALS_VAR} json"))
}

fn require_var(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("required environment variable {name} is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_azure_blob() {
        let blob = r#"{
            "clientId": "cid",
            "clientSecret": "secret",
            "tenantId": "tid",
            "subscriptionId": "sid"
        }"#;
        let creds = parse_azure_credentials(blob).expect("parse");
        assert_eq!(creds.client_id, "cid");
        assert_eq!(creds.subscription_id, "sid");
    }

    #[test]
    fn rejects_missing_fields() {
        let err = parse_azure_credentials(r#"{"clientId": "cid"}"#).unwrap_err();
        assert!(err.to_string().contains("AZURE_CREDENTIALS"));
    }

    #[test]
    fn child_env_carries_arm_variables_and_token() {
        let creds = Credentials {
            azure: AzureCredentials {
                client_id: "cid".to_string(),
                client_secret: "secret".to_string(),
                tenant_id: "tid".to_string(),
                subscription_id: "sid".to_string(),
            },
            pulumi_token: "pul-token".to_string(),
            github_token: "gh-token".to_string(),
        };

        let env = creds.child_env();
        assert!(env.contains(&("ARM_CLIENT_ID".to_string(), "cid".to_string())));
        assert!(env.contains(&("PULUMI_ACCESS_TOKEN".to_string(), "pul-token".to_string())));
        // The repository host token never leaks into provisioning children.
        assert!(!env.iter().any(|(k, _)| k == GITHUB_TOKEN_VAR));
    }
}
