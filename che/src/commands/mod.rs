//! Command dispatch and the shared execution context.
//!
//! The dispatcher resolves the target directory, evaluates the Chefile
//! and wires the real HTTP client and container launcher before handing
//! off to the per-command handlers. Handlers only ever see the
//! [`CommandCtx`], which is how the integration tests substitute mocks.

pub mod destroy;
pub mod down;
pub mod factory;
pub mod init;
pub mod ssh;
pub mod status;
pub mod up;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use che_api::dto::{
    CommandDto, EnvironmentDto, MachineConfDto, WorkspaceConfigDto, WorkspaceDto, DEV_MACHINE_NAME,
    SSH_AGENT_ID,
};
use che_api::{HttpWorkspaceApi, WorkspaceApi};
use che_config::{parse_chefile, CommandConfig, DirLayout, ServerConfig, WorkspaceConfig};
use che_core::error::{CheError, Result};
use che_messages::messages::MESSAGES;
use che_messages::msg;
use che_provider::remote_ip::{detect_host_ip, display_host};
use che_provider::version::resolve_container_version;
use che_provider::{DockerLauncher, ServerLauncher};

use crate::cli::{Args, Command};
use crate::instance;

/// Name of the single environment every created workspace carries.
pub const DEFAULT_ENV: &str = "default";

/// Agents installed on the primary machine: terminal, workspace agent
/// and the SSH agent required by the `ssh` command.
pub const DEFAULT_AGENTS: &[&str] = &[
    "org.eclipse.che.terminal",
    "org.eclipse.che.ws-agent",
    SSH_AGENT_ID,
];

/// Everything a command handler needs: the directory layout, the
/// evaluated configuration and the two external collaborators.
pub struct CommandCtx {
    pub layout: DirLayout,
    pub server: ServerConfig,
    pub workspace: WorkspaceConfig,
    pub instance_id: String,
    pub api: Arc<dyn WorkspaceApi>,
    pub launcher: Arc<dyn ServerLauncher>,
}

impl CommandCtx {
    /// Composite key the local workspace is looked up under.
    pub fn workspace_key(&self) -> String {
        format!(":{}", self.workspace.name)
    }

    /// Browser-facing URL of the control plane. Docker Desktop gateway
    /// addresses are rewritten to localhost for display.
    pub fn che_url(&self) -> String {
        format!(
            "http://{}:{}",
            display_host(&self.server.ip),
            self.server.port
        )
    }

    /// Dashboard route opening the workspace in the IDE. Built locally
    /// so it points at the display host rather than whatever address
    /// the server advertises in its link list.
    pub fn local_ide_url(&self) -> String {
        format!("{}/dashboard/#/ide/che/{}", self.che_url(), self.workspace.name)
    }

    pub fn ensure_initialized(&self, command: &str) -> Result<()> {
        if self.layout.is_initialized() {
            Ok(())
        } else {
            Err(CheError::Precondition(msg!(
                MESSAGES.common_not_initialized,
                command = command
            )))
        }
    }

    /// Fails unless the control plane answers the liveness probe.
    pub async fn ensure_running(&self) -> Result<()> {
        if self.api.ping().await {
            Ok(())
        } else {
            Err(CheError::Precondition(
                MESSAGES.common_not_running.to_string(),
            ))
        }
    }

    /// Resolves the local workspace on the remote side, failing with
    /// the shared not-found message when it is absent.
    pub async fn require_workspace(&self) -> Result<WorkspaceDto> {
        self.api
            .find_workspace(&self.workspace_key())
            .await?
            .ok_or_else(|| {
                CheError::Precondition(msg!(
                    MESSAGES.common_workspace_not_found,
                    url = self.che_url(),
                    name = &self.workspace.name
                ))
            })
    }

    /// Translates the evaluated configuration into the workspace
    /// creation payload: one `default` environment holding the resolved
    /// recipe and a `dev-machine` with the standard agents.
    pub fn build_workspace_config(&self) -> Result<WorkspaceConfigDto> {
        let recipe =
            che_provider::RecipeBuilder::new(self.layout.project_dir()).build(&self.workspace)?;

        let mut attributes = HashMap::new();
        attributes.insert(
            "memoryLimitBytes".to_string(),
            (u64::from(self.workspace.ram) * 1024 * 1024).to_string(),
        );

        let mut machines = HashMap::new();
        machines.insert(
            DEV_MACHINE_NAME.to_string(),
            MachineConfDto {
                agents: DEFAULT_AGENTS.iter().map(|a| a.to_string()).collect(),
                attributes,
            },
        );

        let mut environments = HashMap::new();
        environments.insert(DEFAULT_ENV.to_string(), EnvironmentDto { recipe, machines });

        Ok(WorkspaceConfigDto {
            name: self.workspace.name.clone(),
            default_env: DEFAULT_ENV.to_string(),
            environments,
            commands: self.workspace.commands.iter().map(command_dto).collect(),
            projects: Vec::new(),
        })
    }
}

/// Maps a Chefile command onto its wire form. An empty type defaults to
/// `custom`; the preview url travels in the attribute bag.
pub fn command_dto(command: &CommandConfig) -> CommandDto {
    let mut attributes = HashMap::new();
    if !command.preview_url.is_empty() {
        attributes.insert("previewUrl".to_string(), command.preview_url.clone());
    }
    CommandDto {
        name: command.name.clone(),
        command_type: if command.command_type.is_empty() {
            "custom".to_string()
        } else {
            command.command_type.clone()
        },
        command_line: command.command_line.clone(),
        attributes,
    }
}

/// Builds the real execution context and runs the requested command.
pub async fn execute_command(args: Args) -> Result<()> {
    let layout = DirLayout::new(resolve_project_dir(args.command.path())?);

    let mut server = ServerConfig::with_defaults(&detect_host_ip());
    let mut workspace = WorkspaceConfig::default();
    let instance_id = instance::load_or_create(&layout);

    // `up` bootstraps an untouched directory before reading its config
    if matches!(args.command, Command::Up { .. }) && !layout.is_initialized() {
        init::initialize(&layout, &server, &workspace, &instance_id)?;
    }
    // an uninitialized directory is reported as such before any Chefile
    // diagnostics, so the parse waits until the handler precondition holds
    if !matches!(args.command, Command::Init { .. }) && layout.is_initialized() {
        parse_chefile(&layout.chefile(), &mut server, &mut workspace)?;
    }

    let api: Arc<dyn WorkspaceApi> = Arc::new(HttpWorkspaceApi::new(&server.ip, server.port));
    let launcher: Arc<dyn ServerLauncher> = Arc::new(DockerLauncher::new(
        layout.clone(),
        server.clone(),
        &instance_id,
        &resolve_container_version(),
    ));

    let ctx = CommandCtx {
        layout,
        server,
        workspace,
        instance_id,
        api,
        launcher,
    };

    match &args.command {
        Command::Init { .. } => {
            init::handle_init(&ctx)?;
            Ok(())
        }
        Command::Up { .. } => up::handle_up(&ctx).await,
        Command::Down { .. } => down::handle_down(&ctx).await,
        Command::Destroy { .. } => destroy::handle_destroy(&ctx).await,
        Command::Ssh { .. } => ssh::handle_ssh(&ctx).await,
        Command::Status { .. } => status::handle_status(&ctx).await,
        Command::Factory { .. } => factory::handle_factory(&ctx),
    }
}

fn resolve_project_dir(path: Option<&PathBuf>) -> Result<PathBuf> {
    let dir = match path {
        Some(p) => p.clone(),
        None => std::env::current_dir()?,
    };
    if !dir.is_dir() {
        return Err(CheError::Precondition(format!(
            "Directory {} does not exist",
            dir.display()
        )));
    }
    Ok(fs::canonicalize(&dir)?)
}
