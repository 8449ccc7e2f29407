//! Typed configuration tree filled in by the Chefile interpreter.
//!
//! The `che` binding of a Chefile maps onto [`ServerConfig`] and the
//! `workspace` binding onto [`WorkspaceConfig`]. Both are rebuilt from
//! defaults on every command invocation and then mutated by the parser;
//! after [`WorkspaceConfig::compact`] they are read-only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;

/// Default control-plane port when `CHE_PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Default workspace RAM in megabytes.
pub const DEFAULT_RAM_MB: u32 = 2048;

/// Default workspace name for the single local workspace.
pub const DEFAULT_WORKSPACE_NAME: &str = "local";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    #[default]
    Local,
    Remote,
}

/// Settings of the control-plane server the orchestrator talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(rename = "type")]
    pub server_type: ServerType,
    pub ip: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    /// Arbitrary environment injections passed to the launcher container.
    /// Ordered so generated command lines stay deterministic.
    pub properties: BTreeMap<String, String>,
}

impl ServerConfig {
    /// Builds the default local server settings.
    ///
    /// `CHE_PORT` overrides the port; `CHE_HOST_IP` overrides the
    /// detected host ip and is additionally forwarded to the launcher
    /// as an environment property.
    pub fn with_defaults(detected_ip: &str) -> Self {
        let mut properties = BTreeMap::new();

        let ip = match env::var("CHE_HOST_IP") {
            Ok(host_ip) => {
                properties.insert("CHE_HOST_IP".to_string(), host_ip.clone());
                host_ip
            }
            Err(_) => detected_ip.to_string(),
        };

        let port = env::var("CHE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            server_type: ServerType::Local,
            ip,
            port,
            user: String::new(),
            pass: String::new(),
            properties,
        }
    }
}

/// One named command available inside the workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub command_type: String,
    pub command_line: String,
    /// Attribute bag; only `previewUrl` is recognized today.
    pub preview_url: String,
}

/// A post-load action: either a reference to a named command or an
/// inline script, never both and never neither after compaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAction {
    pub command: Option<String>,
    pub script: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSource {
    pub location: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub attributes: BTreeMap<String, String>,
}

/// A project to provision inside the workspace. An empty
/// `source.location` means "use the project already present in the
/// mounted folder" instead of importing from a remote source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub source: ProjectSource,
}

/// Declarative runtime selection; resolved to exactly one normalized
/// recipe by the recipe builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeRecipeSpec {
    /// Docker image reference, highest precedence.
    pub image: String,
    /// Back-compatibility alias for inline dockerfile text.
    pub content: String,
    /// Inline dockerfile text.
    pub dockerfile: String,
    /// Inline compose file content.
    pub composefile: String,
    /// External recipe location (URL).
    pub location: String,
}

/// The `workspace` binding of a Chefile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    pub name: String,
    pub ram: u32,
    pub commands: Vec<CommandConfig>,
    pub postload: Vec<LoadAction>,
    pub runtime: RuntimeRecipeSpec,
    pub projects: Vec<ProjectSpec>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_WORKSPACE_NAME.to_string(),
            ram: DEFAULT_RAM_MB,
            commands: Vec::new(),
            postload: Vec::new(),
            runtime: RuntimeRecipeSpec::default(),
            projects: Vec::new(),
        }
    }
}

impl WorkspaceConfig {
    /// Removes placeholder entries left behind by index-assignments.
    ///
    /// The interpreter auto-vivifies array slots so scripts can write
    /// `workspace.commands[3].name = ...` without managing growth;
    /// anything that never received its identifying field is dropped
    /// here. All indexes are treated identically. Idempotent.
    pub fn compact(&mut self) {
        self.commands.retain(|c| !c.name.is_empty());
        self.postload.retain(|a| {
            a.command.as_deref().is_some_and(|c| !c.is_empty())
                || a.script.as_deref().is_some_and(|s| !s.is_empty())
        });
        self.projects.retain(|p| !p.name.is_empty());
    }

    /// Looks up a command by name, used to resolve post-load command
    /// references.
    pub fn find_command(&self, name: &str) -> Option<&CommandConfig> {
        self.commands.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compaction_is_idempotent() {
        let mut ws = WorkspaceConfig::default();
        ws.commands.push(CommandConfig {
            name: "build".to_string(),
            command_line: "mvn package".to_string(),
            ..Default::default()
        });
        ws.commands.push(CommandConfig::default());
        ws.postload.push(LoadAction {
            command: Some("build".to_string()),
            script: None,
        });
        ws.postload.push(LoadAction::default());
        ws.projects.push(ProjectSpec::default());

        ws.compact();
        let once = ws.clone();
        ws.compact();

        assert_eq!(ws.commands, once.commands);
        assert_eq!(ws.postload, once.postload);
        assert_eq!(ws.projects, once.projects);
        assert_eq!(ws.commands.len(), 1);
        assert_eq!(ws.postload.len(), 1);
        assert!(ws.projects.is_empty());
    }

    #[test]
    fn default_server_config_uses_detected_ip() {
        let server = ServerConfig::with_defaults("10.0.0.5");
        assert_eq!(server.server_type, ServerType::Local);
        if std::env::var("CHE_HOST_IP").is_err() {
            assert_eq!(server.ip, "10.0.0.5");
        }
    }

    #[test]
    fn find_command_matches_by_name() {
        let mut ws = WorkspaceConfig::default();
        ws.commands.push(CommandConfig {
            name: "run".to_string(),
            command_line: "npm start".to_string(),
            ..Default::default()
        });
        assert!(ws.find_command("run").is_some());
        assert!(ws.find_command("missing").is_none());
    }
}
