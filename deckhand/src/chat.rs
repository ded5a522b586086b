//! The conversational front end.
//!
//! [`ChatSession`] holds the conversation state and the external-collaborator
//! seams; [`run_repl`] wraps it in a line-based readline loop. Every
//! operation error is flattened into a plain apology string at this boundary;
//! no failure kind is treated differently from another.

use std::path::PathBuf;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, instrument};

use crate::core::intent::{classify, Intent};
use crate::core::phase::Phase;
use crate::core::project::{slugify, validate_slug, SiteSpec};
use crate::core::transcript::Transcript;
use crate::create::{create_site, AnalysisOutcome};
use crate::deploy::deploy_site;
use crate::destroy::destroy_site;
use crate::io::config::AssistantConfig;
use crate::io::copilot::Analyst;
use crate::io::github::RepoHost;
use crate::io::pulumi::StackEngine;

/// One conversation with its state and collaborators.
pub struct ChatSession<S, R, A> {
    root: PathBuf,
    cfg: AssistantConfig,
    phase: Phase,
    transcript: Transcript,
    engine: S,
    host: R,
    analyst: A,
}

impl<S: StackEngine, R: RepoHost, A: Analyst> ChatSession<S, R, A> {
    pub fn new(
        root: impl Into<PathBuf>,
        cfg: AssistantConfig,
        engine: S,
        host: R,
        analyst: A,
    ) -> Self {
        Self {
            root: root.into(),
            cfg,
            phase: Phase::Idle,
            transcript: Transcript::new(),
            engine,
            host,
            analyst,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Process one user message and produce the assistant's reply.
    #[instrument(skip_all)]
    pub fn handle_message(&mut self, text: &str) -> String {
        self.transcript.record_user(text);
        let intent = classify(&self.phase, text);
        debug!(?intent, "classified message");

        let reply = match intent {
            Intent::ProvideProjectName(name) => self.on_project_name(&name),
            Intent::ConfirmDeploy | Intent::Deploy => self.on_deploy(),
            Intent::DeclineDeploy => self.on_decline(),
            Intent::Destroy => self.on_destroy(),
            Intent::CreateSite => self.on_create_request(),
            Intent::Unknown => self.capability_menu(),
        };

        self.transcript.record_assistant(reply.clone());
        reply
    }

    fn on_create_request(&mut self) -> String {
        let prior = self.phase.project().map(str::to_string);
        self.phase = Phase::AwaitingProjectName { prior };
        "What would you like to name your project? (A simple name works best; \
         it will be lowercased with hyphens.)"
            .to_string()
    }

    fn on_project_name(&mut self, name: &str) -> String {
        let slug = slugify(name);
        if let Err(err) = validate_slug(&slug) {
            // Stay in the same phase and ask again.
            return format!("That name won't work: {err:#}. What should I call the project?");
        }

        match create_site(&self.root, &self.engine, &self.analyst, &self.cfg, &slug) {
            Ok(outcome) => {
                self.phase = Phase::AwaitingDeployConfirmation {
                    project: slug.clone(),
                };
                match outcome.analysis {
                    AnalysisOutcome::Saved { text, path } => format!(
                        "I've created a new static website project '{slug}' from the \
                         Azure Go template.\n\nCopilot analysis:\n{text}\n\nThe analysis \
                         has been saved to {}.\n\nWould you like me to proceed with \
                         deployment? (yes/no)",
                        path.display()
                    ),
                    AnalysisOutcome::Unsaved { text, error } => format!(
                        "I've created a new static website project '{slug}' from the \
                         Azure Go template.\n\nCopilot analysis:\n{text}\n\n(The analysis \
                         could not be saved: {error})\n\nWould you like me to proceed \
                         with deployment? (yes/no)"
                    ),
                    AnalysisOutcome::Failed { error } => format!(
                        "I've created the project '{slug}', but the code analysis \
                         failed: {error}\n\nWould you like to proceed with deployment \
                         anyway? (yes/no)"
                    ),
                }
            }
            Err(err) => {
                self.phase = self.phase.restored_after_failed_create();
                format!("Sorry, I encountered an error while creating the project: {err:#}")
            }
        }
    }

    fn on_deploy(&mut self) -> String {
        let Some(project) = self.phase.project().map(str::to_string) else {
            return self.capability_menu();
        };
        // The pending question is cleared no matter how deployment goes; the
        // project itself stays active.
        self.phase = Phase::Active {
            project: project.clone(),
        };

        let spec = SiteSpec::for_project(&project);
        match deploy_site(&self.root, &self.engine, &self.host, &self.cfg, &spec) {
            Ok(outcome) => {
                let mut reply =
                    String::from("I've deployed your application. Here's what happened:\n");
                for step in &outcome.steps {
                    reply.push_str(&format!("- {step}\n"));
                }
                match outcome.outputs.outputs {
                    Some(map) if !map.is_empty() => {
                        reply.push_str("\nStack outputs:\n");
                        for (key, value) in &map {
                            let rendered = match value.as_str() {
                                Some(s) => s.to_string(),
                                None => value.to_string(),
                            };
                            reply.push_str(&format!("  {key}: {rendered}\n"));
                        }
                    }
                    _ => {
                        reply.push_str(
                            "\nDeployment completed successfully, but I couldn't fetch \
                             the stack outputs.\n",
                        );
                    }
                }
                reply.trim_end().to_string()
            }
            Err(err) => format!("Sorry, I encountered an error while deploying: {err:#}"),
        }
    }

    fn on_decline(&mut self) -> String {
        let Some(project) = self.phase.project().map(str::to_string) else {
            return self.capability_menu();
        };
        self.phase = Phase::Active {
            project: project.clone(),
        };
        format!("Okay, I'll hold off on deploying '{project}'. Ask me to deploy when you're ready.")
    }

    fn on_destroy(&mut self) -> String {
        let Some(project) = self.phase.project().map(str::to_string) else {
            return "There's no active project to destroy. Would you like to create a new \
                    static website project?"
                .to_string();
        };

        match destroy_site(&self.root, &self.engine, &self.cfg, &project) {
            Ok(steps) => {
                self.phase = Phase::Idle;
                let mut reply =
                    String::from("I've destroyed your application. Here's what I did:\n");
                for step in &steps {
                    reply.push_str(&format!("- {step}\n"));
                }
                reply.trim_end().to_string()
            }
            // Destruction failed: the stack may still exist, so the project
            // stays active.
            Err(err) => {
                format!("Sorry, I encountered an error while destroying the application: {err:#}")
            }
        }
    }

    fn capability_menu(&self) -> String {
        match &self.phase {
            Phase::AwaitingDeployConfirmation { project } => format!(
                "I can help you manage your project '{project}'. You can ask me to:\n\
                 - deploy your application\n\
                 - destroy your application\n\
                 Or create a new static website.\n\
                 (Deployment of '{project}' is still pending - say yes to proceed.)"
            ),
            Phase::Active { project } => format!(
                "I can help you manage your project '{project}'. You can ask me to:\n\
                 - deploy your application\n\
                 - destroy your application\n\
                 Or create a new static website."
            ),
            Phase::Idle | Phase::AwaitingProjectName { .. } => {
                "I can help you create and manage static websites on Azure. Would you \
                 like me to create a simple Go app for a static website? Just let me know!"
                    .to_string()
            }
        }
    }
}

/// Line-based readline loop over a session.
///
/// `exit`/`quit` (or Ctrl-D) leaves the loop; Ctrl-C only interrupts the
/// current line.
pub fn run_repl<S: StackEngine, R: RepoHost, A: Analyst>(
    session: &mut ChatSession<S, R, A>,
) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("Welcome to the platform engineering assistant.");
    println!("I can help you create and manage static websites on Azure.");
    println!("You can ask me to:");
    println!("  - create a simple Go app for a static website");
    println!("  - deploy your application");
    println!("  - destroy your application");
    println!("Type 'exit' to quit.");
    println!();

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
                    break;
                }
                let _ = rl.add_history_entry(trimmed);
                let reply = session.handle_message(trimmed);
                println!("\n{reply}\n");
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted. Type 'exit' to leave.");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    println!("Goodbye!");
    Ok(())
}
