//! Wire DTOs for the workspace control-plane API.
//!
//! Field names follow the remote JSON contract (camelCase); optional
//! payloads stay `Option` so partially populated responses deserialize
//! without loss.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of the SSH capability agent a machine must carry before
/// an interactive session can be opened against it.
pub const SSH_AGENT_ID: &str = "org.eclipse.che.ssh";

/// Well-known name of the workspace's primary machine.
pub const DEV_MACHINE_NAME: &str = "dev-machine";

/// Server map key of the forwarded SSH port.
pub const SSH_SERVER_REF: &str = "22/tcp";

/// Link relation of the workspace IDE URL.
pub const IDE_URL_REL: &str = "ide url";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceStatus {
    Stopped,
    Starting,
    Running,
    Stopping,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDto {
    pub rel: String,
    pub href: String,
}

/// A normalized machine recipe: how to build or pull the workspace's
/// primary machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDto {
    #[serde(rename = "type")]
    pub recipe_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineConfDto {
    #[serde(default)]
    pub agents: Vec<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDto {
    pub recipe: RecipeDto,
    #[serde(default)]
    pub machines: HashMap<String, MachineConfDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDto {
    pub name: String,
    #[serde(rename = "type")]
    pub command_type: String,
    pub command_line: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStorageDto {
    #[serde(rename = "type")]
    pub source_type: String,
    pub location: String,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfigDto {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub project_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceStorageDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfigDto {
    pub name: String,
    pub default_env: String,
    pub environments: HashMap<String, EnvironmentDto>,
    #[serde(default)]
    pub commands: Vec<CommandDto>,
    #[serde(default)]
    pub projects: Vec<ProjectConfigDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRefDto {
    /// `host:port` of the forwarded server.
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRuntimeDto {
    #[serde(default)]
    pub servers: HashMap<String, ServerRefDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<MachineRuntimeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRuntimeDto {
    pub dev_machine: MachineDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDto {
    pub id: String,
    pub status: WorkspaceStatus,
    pub config: WorkspaceConfigDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<WorkspaceRuntimeDto>,
    #[serde(default)]
    pub links: Vec<LinkDto>,
}

impl WorkspaceDto {
    /// Href of the `ide url` link, when the server advertised one.
    pub fn ide_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel == IDE_URL_REL)
            .map(|l| l.href.as_str())
    }

    /// The primary machine of the running workspace.
    pub fn dev_machine(&self) -> Option<&MachineDto> {
        self.runtime.as_ref().map(|r| &r.dev_machine)
    }

    /// Forwarded SSH port of the primary machine, parsed from the
    /// `22/tcp` server address.
    pub fn ssh_port(&self) -> Option<u16> {
        let address = &self
            .dev_machine()?
            .runtime
            .as_ref()?
            .servers
            .get(SSH_SERVER_REF)?
            .address;
        address.rsplit(':').next()?.parse().ok()
    }
}

/// Shareable factory descriptor bundling a workspace configuration and
/// its project sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryDto {
    pub v: String,
    pub name: String,
    pub workspace: WorkspaceConfigDto,
}

/// Reply of the project-type estimation endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateDto {
    #[serde(default)]
    pub matched: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_workspace(address: &str) -> WorkspaceDto {
        let mut servers = HashMap::new();
        servers.insert(
            SSH_SERVER_REF.to_string(),
            ServerRefDto {
                address: address.to_string(),
            },
        );
        WorkspaceDto {
            id: "workspace-1".to_string(),
            status: WorkspaceStatus::Running,
            config: WorkspaceConfigDto {
                name: "local".to_string(),
                default_env: "default".to_string(),
                environments: HashMap::new(),
                commands: Vec::new(),
                projects: Vec::new(),
            },
            runtime: Some(WorkspaceRuntimeDto {
                dev_machine: MachineDto {
                    id: "machine-1".to_string(),
                    runtime: Some(MachineRuntimeDto { servers }),
                },
            }),
            links: vec![LinkDto {
                rel: IDE_URL_REL.to_string(),
                href: "http://127.0.0.1:8080/ide/local".to_string(),
            }],
        }
    }

    #[test]
    fn ssh_port_comes_from_the_server_address() {
        let ws = running_workspace("172.17.0.1:32768");
        assert_eq!(ws.ssh_port(), Some(32768));
    }

    #[test]
    fn ssh_port_absent_without_runtime() {
        let mut ws = running_workspace("172.17.0.1:32768");
        ws.runtime = None;
        assert_eq!(ws.ssh_port(), None);
    }

    #[test]
    fn ide_url_reads_the_link_list() {
        let ws = running_workspace("h:1");
        assert_eq!(ws.ide_url(), Some("http://127.0.0.1:8080/ide/local"));
    }

    #[test]
    fn workspace_status_uses_wire_casing() {
        let status: WorkspaceStatus = serde_json::from_str("\"RUNNING\"").unwrap();
        assert_eq!(status, WorkspaceStatus::Running);
    }
}
