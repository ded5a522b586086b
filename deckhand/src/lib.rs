//! Conversational assistant for provisioning a fixed static-website stack.
//!
//! This crate implements a line-based chat loop that drives the Pulumi CLI,
//! git, the GitHub REST API, and Pulumi's hosted code-analysis endpoint. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (intent dispatch, conversation
//!   state, project naming). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (subprocesses, HTTP, filesystem).
//!   Behind trait seams to enable scripted fakes in tests.
//!
//! Orchestration modules ([`chat`], [`create`], [`deploy`], [`destroy`],
//! [`doctor`]) coordinate core logic with I/O to implement the assistant's
//! commands.

pub mod chat;
pub mod core;
pub mod create;
pub mod deploy;
pub mod destroy;
pub mod doctor;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
