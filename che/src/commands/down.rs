//! `down`: stops the running server container.

use che_core::error::Result;
use che_core::{che_println, che_success};
use che_messages::messages::MESSAGES;
use che_messages::msg;

use crate::commands::CommandCtx;

pub async fn handle_down(ctx: &CommandCtx) -> Result<()> {
    ctx.ensure_initialized("down")?;

    che_println!("{}", MESSAGES.down_search);
    ctx.ensure_running().await?;
    che_println!("{}", msg!(MESSAGES.down_found, url = ctx.che_url()));

    che_println!("{}", MESSAGES.down_stopping);
    ctx.launcher.stop()?;
    che_success!("{}", MESSAGES.down_stopped);
    Ok(())
}
