//! `destroy`: deletes the remote workspace, then stops the server.

use tracing::debug;

use che_core::error::Result;
use che_core::{che_println, che_success, che_warning};
use che_messages::messages::MESSAGES;
use che_messages::msg;

use crate::commands::CommandCtx;

pub async fn handle_destroy(ctx: &CommandCtx) -> Result<()> {
    ctx.ensure_initialized("destroy")?;
    ctx.ensure_running().await?;

    match ctx.api.find_workspace(&ctx.workspace_key()).await? {
        Some(workspace) => {
            che_println!(
                "{}",
                msg!(
                    MESSAGES.destroy_destroying_workspace,
                    name = &ctx.workspace.name
                )
            );
            // a workspace that never started rejects the stop
            if let Err(e) = ctx.api.stop_workspace(&workspace.id).await {
                debug!("Stop before delete failed: {}", e);
            }
            ctx.api.delete_workspace(&workspace.id).await?;
            che_println!(
                "{}",
                msg!(
                    MESSAGES.destroy_destroyed_workspace,
                    name = &ctx.workspace.name
                )
            );
        }
        None => {
            che_warning!(
                "{}",
                msg!(
                    MESSAGES.destroy_workspace_not_existing,
                    name = &ctx.workspace.name
                )
            );
        }
    }

    che_println!("{}", MESSAGES.down_stopping);
    ctx.launcher.stop()?;
    che_success!("{}", MESSAGES.down_stopped);
    Ok(())
}
