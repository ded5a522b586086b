//! Hosted AI code-analysis client.
//!
//! The [`Analyst`] trait decouples orchestration from Pulumi's Copilot chat
//! endpoint. One request per analysis; the first assistant message of kind
//! `response` is the analysis text.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use minijinja::{context, Environment};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const ANALYSIS_TEMPLATE: &str = include_str!("prompts/analysis.md");
const CHAT_ENDPOINT: &str = "/api/ai/chat/preview";

/// Abstraction over code-analysis backends.
pub trait Analyst {
    /// Analyze the project's program and return the analysis text.
    fn analyze(&self, project_dir: &Path, project: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    query: String,
    state: ClientState,
}

#[derive(Debug, Serialize)]
struct ClientState {
    client: ClientContext,
}

#[derive(Debug, Serialize)]
struct ClientContext {
    #[serde(rename = "cloudContext")]
    cloud_context: CloudContext,
}

#[derive(Debug, Serialize)]
struct CloudContext {
    #[serde(rename = "orgId")]
    org_id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    content: String,
}

/// Extract the analysis text from a raw chat response body.
///
/// Returns the content of the first `role == "assistant"` message with
/// `kind == "response"`; malformed JSON or a response without one is an
/// error.
pub fn extract_analysis(raw: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(raw).context("parse analysis response json")?;
    response
        .messages
        .into_iter()
        .find(|m| m.role == "assistant" && m.kind == "response")
        .map(|m| m.content)
        .ok_or_else(|| anyhow!("no analysis found in response"))
}

/// Analyst backed by the hosted chat endpoint.
pub struct Copilot {
    client: Client,
    base_url: String,
    token: String,
    org: String,
    /// Cloud-console URL sent as conversation context.
    context_url: String,
}

impl Copilot {
    pub fn new(base_url: String, token: String, org: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url,
            token,
            org,
            context_url: "https://app.pulumi.com".to_string(),
        })
    }

    fn render_query(code: &str) -> Result<String> {
        let mut env = Environment::new();
        env.add_template("analysis", ANALYSIS_TEMPLATE)
            .context("analysis template should be valid")?;
        let template = env.get_template("analysis")?;
        let rendered = template.render(context! { code => code })?;
        Ok(rendered)
    }
}

impl Analyst for Copilot {
    #[instrument(skip_all, fields(project))]
    fn analyze(&self, project_dir: &Path, project: &str) -> Result<String> {
        let program_path = project_dir.join("main.go");
        let code = fs::read_to_string(&program_path)
            .with_context(|| format!("read {}", program_path.display()))?;

        let endpoint = format!("{}{CHAT_ENDPOINT}", self.base_url.trim_end_matches('/'));
        debug!(endpoint = %endpoint, "requesting analysis");

        let request = ChatRequest {
            query: Self::render_query(&code)?,
            state: ClientState {
                client: ClientContext {
                    cloud_context: CloudContext {
                        org_id: self.org.clone(),
                        url: self.context_url.clone(),
                    },
                },
            },
        };

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", format!("token {}", self.token))
            .json(&request)
            .send()
            .context("send analysis request")?;

        let status = response.status();
        let body = response.text().context("read analysis response")?;
        if !status.is_success() {
            return Err(anyhow!(
                "analysis request failed with status {status}: {}",
                body.trim()
            ));
        }

        let analysis = extract_analysis(&body)?;
        info!(chars = analysis.len(), "analysis received");
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_assistant_response() {
        let raw = r#"{
            "messages": [
                {"role": "user", "kind": "message", "content": "query"},
                {"role": "assistant", "kind": "thought", "content": "thinking"},
                {"role": "assistant", "kind": "response", "content": "looks good"},
                {"role": "assistant", "kind": "response", "content": "later"}
            ]
        }"#;
        assert_eq!(extract_analysis(raw).expect("extract"), "looks good");
    }

    #[test]
    fn missing_response_message_is_an_error() {
        let raw = r#"{"messages": [{"role": "user", "kind": "message", "content": "q"}]}"#;
        let err = extract_analysis(raw).unwrap_err();
        assert!(err.to_string().contains("no analysis found"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = extract_analysis("not json").unwrap_err();
        assert!(err.to_string().contains("parse analysis response"));
    }

    #[test]
    fn request_body_matches_wire_format() {
        let request = ChatRequest {
            query: "q".to_string(),
            state: ClientState {
                client: ClientContext {
                    cloud_context: CloudContext {
                        org_id: "acme".to_string(),
                        url: "https://app.pulumi.com".to_string(),
                    },
                },
            },
        };
        let body = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({
                "query": "q",
                "state": {"client": {"cloudContext": {"orgId": "acme", "url": "https://app.pulumi.com"}}},
            })
        );
    }

    #[test]
    fn query_embeds_the_program_source() {
        let query = Copilot::render_query("package main").expect("render");
        assert!(query.contains("Please analyze this Pulumi Go code"));
        assert!(query.contains("package main"));
    }
}
