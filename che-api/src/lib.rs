//! Typed client for the remote workspace control-plane API.
//!
//! The orchestrator only ever talks to the remote side through the
//! [`WorkspaceApi`] trait so integration tests can substitute a mock;
//! [`HttpWorkspaceApi`] is the real JSON/HTTP implementation.

pub mod client;
pub mod dto;

pub use client::{HttpWorkspaceApi, WorkspaceApi};
