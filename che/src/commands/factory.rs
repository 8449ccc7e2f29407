//! `factory`: exports the configuration as a shareable factory
//! descriptor, sourcing the project from the git origin remote.

use std::collections::HashMap;
use std::fs;

use regex::Regex;

use che_api::dto::{FactoryDto, ProjectConfigDto, SourceStorageDto};
use che_core::che_println;
use che_core::error::{CheError, Result};
use che_messages::messages::MESSAGES;
use che_messages::msg;

use crate::commands::CommandCtx;

/// Factory wire-format version emitted in the descriptor.
const FACTORY_VERSION: &str = "4.0";

pub fn handle_factory(ctx: &CommandCtx) -> Result<()> {
    ctx.ensure_initialized("factory")?;

    let git_config = ctx.layout.git_config();
    if !git_config.is_file() {
        return Err(CheError::Precondition(MESSAGES.factory_no_git.to_string()));
    }
    let origin = origin_url(&fs::read_to_string(&git_config)?)
        .ok_or_else(|| CheError::Precondition(MESSAGES.factory_no_origin.to_string()))?;

    let factory = build_factory(ctx, origin)?;
    let json = serde_json::to_string_pretty(&factory)
        .map_err(|e| CheError::Serialization(e.to_string()))?;
    che_println!("{}", msg!(MESSAGES.factory_json, json = json));
    Ok(())
}

/// Assembles the descriptor: the evaluated workspace configuration plus
/// one project sourced from the given git url.
pub fn build_factory(ctx: &CommandCtx, origin: String) -> Result<FactoryDto> {
    let mut workspace = ctx.build_workspace_config()?;
    let project_type = ctx
        .workspace
        .projects
        .first()
        .map(|p| p.project_type.clone())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "blank".to_string());
    workspace.projects.push(ProjectConfigDto {
        name: ctx.layout.folder_name().to_string(),
        path: format!("/{}", ctx.layout.folder_name()),
        project_type,
        source: Some(SourceStorageDto {
            source_type: "git".to_string(),
            location: origin,
            parameters: HashMap::new(),
        }),
    });

    Ok(FactoryDto {
        v: FACTORY_VERSION.to_string(),
        name: ctx.layout.folder_name().to_string(),
        workspace,
    })
}

/// Extracts the url of the `origin` remote from a `.git/config` file.
pub fn origin_url(config: &str) -> Option<String> {
    let pattern = Regex::new(r#"(?s)\[remote "origin"\].*?url\s*=\s*(\S+)"#).ok()?;
    pattern
        .captures(config)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_origin_remote_url() {
        let config = concat!(
            "[core]\n",
            "\trepositoryformatversion = 0\n",
            "[remote \"origin\"]\n",
            "\turl = https://github.com/eclipse/che.git\n",
            "\tfetch = +refs/heads/*:refs/remotes/origin/*\n",
        );
        assert_eq!(
            origin_url(config).as_deref(),
            Some("https://github.com/eclipse/che.git")
        );
    }

    #[test]
    fn no_origin_remote_yields_none() {
        let config = "[core]\n\tbare = false\n[remote \"upstream\"]\n\turl = x\n";
        assert_eq!(origin_url(config), None);
    }
}
