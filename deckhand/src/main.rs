//! Conversational assistant for a fixed Azure static-website stack.
//!
//! `deckhand chat` starts the line-based dialogue; `deckhand doctor` checks
//! that configuration and credentials are in place before a session.

use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use deckhand::chat::{run_repl, ChatSession};
use deckhand::io::config::load_config;
use deckhand::io::copilot::Copilot;
use deckhand::io::credentials::Credentials;
use deckhand::io::github::GitHub;
use deckhand::io::pulumi::PulumiCli;
use deckhand::{doctor, exit_codes, logging};

#[derive(Parser)]
#[command(
    name = "deckhand",
    version,
    about = "Conversational provisioning assistant for static websites"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session.
    Chat,
    /// Check configuration and credentials without starting a session.
    Doctor,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = env::current_dir().context("determine working directory")?;
    match cli.command {
        Command::Chat => cmd_chat(&root),
        Command::Doctor => doctor::run(&root),
    }
}

fn cmd_chat(root: &Path) -> Result<()> {
    let cfg = load_config(&root.join(".deckhand").join("config.toml"))?;
    let creds = Credentials::from_env()?;

    let engine = PulumiCli::new(
        creds.child_env(),
        Duration::from_secs(cfg.command_timeout_secs),
        cfg.output_limit_bytes,
    );
    let host = GitHub::new(
        cfg.github.api_url.clone(),
        creds.github_token.clone(),
        cfg.github.private,
        Duration::from_secs(cfg.api.timeout_secs),
    )?;
    let analyst = Copilot::new(
        cfg.api.base_url.clone(),
        creds.pulumi_token.clone(),
        cfg.org.clone(),
        Duration::from_secs(cfg.api.timeout_secs),
    )?;

    let mut session = ChatSession::new(root, cfg, engine, host, analyst);
    run_repl(&mut session)
}
