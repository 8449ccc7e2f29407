//! `init`: prepares a directory for hosting a che instance.

use std::fs;

use tracing::debug;

use che_config::template::default_chefile;
use che_config::{DirLayout, ServerConfig, WorkspaceConfig};
use che_core::error::Result;
use che_core::{che_println, che_warning};
use che_messages::messages::MESSAGES;
use che_messages::msg;

use crate::commands::CommandCtx;
use crate::instance;

/// Initializes the directory unless it already is; returns whether any
/// work was done. Re-running is a warning, not an error.
pub fn handle_init(ctx: &CommandCtx) -> Result<bool> {
    if ctx.layout.is_initialized() {
        che_warning!("{}", MESSAGES.init_already_initialized);
        return Ok(false);
    }
    initialize(&ctx.layout, &ctx.server, &ctx.workspace, &ctx.instance_id)?;
    Ok(true)
}

/// Creates the `.che` folder tree, persists the instance id and writes
/// a commented default Chefile when none exists yet.
pub fn initialize(
    layout: &DirLayout,
    server: &ServerConfig,
    workspace: &WorkspaceConfig,
    instance_id: &str,
) -> Result<()> {
    che_println!("{}", msg!(MESSAGES.init_adding_folder, folder = ".che"));
    fs::create_dir_all(layout.workspaces_dir())?;
    instance::persist(layout, instance_id)?;

    let chefile = layout.chefile();
    if chefile.exists() {
        debug!("Chefile already present, keeping it");
    } else {
        che_println!(
            "{}",
            msg!(
                MESSAGES.init_generating_chefile,
                chefile = chefile.display().to_string()
            )
        );
        fs::write(&chefile, default_chefile(server, workspace))?;
    }
    Ok(())
}
