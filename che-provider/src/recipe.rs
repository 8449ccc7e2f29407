//! Recipe builder.
//!
//! Converts the workspace's declarative runtime configuration into a
//! single normalized recipe for the remote API. Deterministic; the only
//! I/O is reading a local `Dockerfile` when nothing else matched.

use std::fs;
use std::path::{Path, PathBuf};

use che_api::dto::RecipeDto;
use che_config::model::WorkspaceConfig;
use che_core::error::Result;

pub const DOCKERFILE_CONTENT_TYPE: &str = "text/x-dockerfile";
pub const COMPOSE_CONTENT_TYPE: &str = "application/x-yaml";

/// Dockerfile used when neither the configuration nor the project
/// directory provides a runtime.
pub const DEFAULT_DOCKERFILE_CONTENT: &str = "FROM eclipse/ubuntu_jdk8";

/// Builds machine recipes for one project directory.
pub struct RecipeBuilder {
    project_dir: PathBuf,
}

impl RecipeBuilder {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    /// Resolves the runtime spec to exactly one recipe.
    ///
    /// Precedence: image reference > inline `content` alias > inline
    /// dockerfile > compose file > external location > local
    /// `Dockerfile` > built-in default image.
    pub fn build(&self, workspace: &WorkspaceConfig) -> Result<RecipeDto> {
        let runtime = &workspace.runtime;

        if !runtime.image.is_empty() {
            return Ok(RecipeDto {
                recipe_type: "dockerimage".to_string(),
                content_type: None,
                content: None,
                location: Some(runtime.image.clone()),
            });
        }
        if !runtime.content.is_empty() {
            return Ok(dockerfile_recipe(runtime.content.clone()));
        }
        if !runtime.dockerfile.is_empty() {
            return Ok(dockerfile_recipe(runtime.dockerfile.clone()));
        }
        if !runtime.composefile.is_empty() {
            return Ok(RecipeDto {
                recipe_type: "compose".to_string(),
                content_type: Some(COMPOSE_CONTENT_TYPE.to_string()),
                content: Some(runtime.composefile.clone()),
                location: None,
            });
        }
        if !runtime.location.is_empty() {
            return Ok(RecipeDto {
                recipe_type: "dockerfile".to_string(),
                content_type: Some(DOCKERFILE_CONTENT_TYPE.to_string()),
                content: None,
                location: Some(runtime.location.clone()),
            });
        }

        let local_dockerfile = self.project_dir.join("Dockerfile");
        if local_dockerfile.is_file() {
            return Ok(dockerfile_recipe(read_dockerfile(&local_dockerfile)?));
        }

        Ok(dockerfile_recipe(DEFAULT_DOCKERFILE_CONTENT.to_string()))
    }
}

fn dockerfile_recipe(content: String) -> RecipeDto {
    RecipeDto {
        recipe_type: "dockerfile".to_string(),
        content_type: Some(DOCKERFILE_CONTENT_TYPE.to_string()),
        content: Some(content),
        location: None,
    }
}

fn read_dockerfile(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}
