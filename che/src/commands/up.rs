//! `up`: boots the server, provisions the workspace and leaves it
//! ready to connect to.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use futures::future::try_join_all;
use tracing::{debug, warn};
use uuid::Uuid;

use che_api::dto::{CommandDto, SourceStorageDto, WorkspaceDto};
use che_config::ProjectSpec;
use che_core::error::{CheError, Result};
use che_core::{che_println, che_success};
use che_messages::messages::MESSAGES;
use che_messages::msg;
use che_provider::SshKeyProvisioner;

use crate::commands::{command_dto, CommandCtx};
use crate::readiness::{wait_until_ready, DEFAULT_ATTEMPTS, DEFAULT_INTERVAL};

pub async fn handle_up(ctx: &CommandCtx) -> Result<()> {
    let started_at = Instant::now();

    if ctx.api.ping().await {
        return Err(CheError::Precondition(
            MESSAGES.up_existing_instance.to_string(),
        ));
    }

    che_println!("{}", MESSAGES.up_starting);
    ctx.launcher.boot()?;
    wait_until_ready(|| ctx.api.ping(), DEFAULT_ATTEMPTS, DEFAULT_INTERVAL).await?;
    che_println!("{}", msg!(MESSAGES.up_running, url = ctx.che_url()));

    let (workspace, newly_created) = match ctx.api.find_workspace(&ctx.workspace_key()).await? {
        Some(existing) => {
            che_println!("{}", MESSAGES.up_workspace_previous_start);
            (existing, false)
        }
        None => {
            let config = ctx.build_workspace_config()?;
            let created = ctx.api.create_workspace(&config).await?;
            che_println!("{}", MESSAGES.up_workspace_created);
            (created, true)
        }
    };

    che_println!("{}", MESSAGES.up_workspace_booting);
    ctx.api.start_workspace(&workspace.id).await?;
    let workspace = ctx.api.get_workspace(&workspace.id).await?;

    authorize_ssh_access(ctx, &workspace).await?;
    // projects on a reused workspace were imported by the first `up`
    if newly_created {
        provision_projects(ctx, &workspace).await?;
    }
    run_postload_actions(ctx, &workspace).await?;

    che_success!("{}", MESSAGES.up_workspace_booted);
    debug!("Startup took {:?}", started_at.elapsed());
    che_println!(
        "{}",
        msg!(MESSAGES.up_workspace_connect_to, url = ctx.local_ide_url())
    );
    Ok(())
}

fn dev_machine_id(workspace: &WorkspaceDto) -> Result<String> {
    workspace
        .dev_machine()
        .map(|machine| machine.id.clone())
        .ok_or_else(|| CheError::Api("Workspace has no running dev machine".to_string()))
}

/// Fresh per-submission output channel, shaped like the channels the
/// IDE subscribes to.
fn output_channel() -> String {
    format!("process:output:{}", Uuid::new_v4())
}

/// Budget for getting the authorized-keys command accepted.
const SSH_SETUP_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Appends the local public key to the workspace user's authorized
/// keys so `che ssh` can connect. Only the submission is awaited
/// (bounded by [`SSH_SETUP_SUBMIT_TIMEOUT`]); completion inside the
/// machine is best-effort.
async fn authorize_ssh_access(ctx: &CommandCtx, workspace: &WorkspaceDto) -> Result<()> {
    let pair = SshKeyProvisioner::new(&ctx.layout).ensure_key_pair()?;
    let machine_id = dev_machine_id(workspace)?;

    let command = CommandDto {
        name: "setup ssh".to_string(),
        command_type: "custom".to_string(),
        command_line: format!(
            "(mkdir $HOME/.ssh || true) && echo \"{}\" >> $HOME/.ssh/authorized_keys",
            pair.public_key.trim_end()
        ),
        attributes: HashMap::new(),
    };

    let channel = output_channel();
    let submission = ctx.api.execute_command(&machine_id, &command, &channel);
    match tokio::time::timeout(SSH_SETUP_SUBMIT_TIMEOUT, submission).await {
        Ok(result) => result,
        Err(_) => Err(CheError::Timeout(MESSAGES.up_ssh_setup_timeout.to_string())),
    }
}

/// Imports and configures all declared projects concurrently. With no
/// declarations the mounted folder itself becomes the single implicit
/// project.
async fn provision_projects(ctx: &CommandCtx, workspace: &WorkspaceDto) -> Result<()> {
    che_println!("{}", MESSAGES.up_updating_projects);

    let mut specs = ctx.workspace.projects.clone();
    if specs.is_empty() {
        specs.push(ProjectSpec {
            name: ctx.layout.folder_name().to_string(),
            ..Default::default()
        });
    }

    try_join_all(
        specs
            .iter()
            .map(|spec| provision_project(ctx, &workspace.id, spec)),
    )
    .await?;
    Ok(())
}

async fn provision_project(ctx: &CommandCtx, workspace_id: &str, spec: &ProjectSpec) -> Result<()> {
    let wanted_type = if spec.project_type.is_empty() {
        "blank"
    } else {
        spec.project_type.as_str()
    };

    // no source location means the project content arrives through the
    // volume mount under the folder's name
    if spec.source.location.is_empty() {
        return configure_project(ctx, workspace_id, ctx.layout.folder_name(), wanted_type, None)
            .await;
    }

    let source = SourceStorageDto {
        source_type: if spec.source.source_type.is_empty() {
            "git".to_string()
        } else {
            spec.source.source_type.clone()
        },
        location: spec.source.location.clone(),
        parameters: spec
            .source
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    };
    ctx.api
        .import_project(workspace_id, &spec.name, &source)
        .await
        .map_err(|e| {
            CheError::Api(msg!(
                MESSAGES.up_import_failed,
                name = &spec.name,
                error = e.to_string()
            ))
        })?;
    configure_project(ctx, workspace_id, &spec.name, wanted_type, Some(source)).await
}

/// Asks the server whether the wanted type fits the project content and
/// writes the final configuration, falling back to `blank` otherwise.
async fn configure_project(
    ctx: &CommandCtx,
    workspace_id: &str,
    name: &str,
    wanted_type: &str,
    source: Option<SourceStorageDto>,
) -> Result<()> {
    let matched = ctx
        .api
        .estimate_project(workspace_id, name, wanted_type)
        .await?;
    let final_type = if matched {
        wanted_type
    } else {
        warn!(
            "Project {} does not match type {}, falling back to blank",
            name, wanted_type
        );
        "blank"
    };

    let mut project = ctx.api.get_project(workspace_id, name).await?;
    project.project_type = final_type.to_string();
    if let Some(source) = source {
        project.source = Some(source);
    }
    ctx.api.update_project(workspace_id, name, &project).await
}

/// Submits every post-load action for execution inside the machine.
/// Command references resolve against the Chefile commands; unknown
/// references are skipped with a warning.
async fn run_postload_actions(ctx: &CommandCtx, workspace: &WorkspaceDto) -> Result<()> {
    if ctx.workspace.postload.is_empty() {
        return Ok(());
    }
    che_println!("{}", MESSAGES.up_executing_actions);
    let machine_id = dev_machine_id(workspace)?;

    let mut commands = Vec::new();
    for action in &ctx.workspace.postload {
        if let Some(name) = action.command.as_deref() {
            match ctx.workspace.find_command(name) {
                Some(command) => commands.push(command_dto(command)),
                None => warn!("Post-load action references unknown command {}", name),
            }
        } else if let Some(script) = action.script.as_deref() {
            commands.push(CommandDto {
                name: "custom postloading command".to_string(),
                command_type: "custom".to_string(),
                command_line: script.to_string(),
                attributes: HashMap::new(),
            });
        }
    }

    try_join_all(commands.iter().map(|command| {
        let machine_id = machine_id.clone();
        async move {
            ctx.api
                .execute_command(&machine_id, command, &output_channel())
                .await
        }
    }))
    .await?;
    Ok(())
}
