//! Lifecycle orchestrator for a directory-scoped Eclipse Che instance.
//!
//! Exposed as a library so the integration tests can drive the command
//! handlers against mocked collaborators; the `che` binary is a thin
//! wrapper around [`commands::execute_command`].

pub mod cli;
pub mod commands;
pub mod instance;
pub mod readiness;
