//! `status`: reports the workspace name, IDE url and instance id.

use che_core::che_println;
use che_core::error::Result;
use che_messages::messages::MESSAGES;
use che_messages::msg;

use crate::commands::CommandCtx;

pub async fn handle_status(ctx: &CommandCtx) -> Result<()> {
    ctx.ensure_initialized("status")?;
    ctx.ensure_running().await?;
    let workspace = ctx.require_workspace().await?;

    che_println!(
        "{}",
        msg!(MESSAGES.status_workspace_name, name = &workspace.config.name)
    );
    che_println!(
        "{}",
        msg!(
            MESSAGES.status_workspace_url,
            url = workspace.ide_url().unwrap_or("N/A")
        )
    );
    che_println!(
        "{}",
        msg!(MESSAGES.status_instance_id, id = &ctx.instance_id)
    );
    Ok(())
}
