//! On-disk layout of the hidden `.che` instance directory.

use std::path::{Path, PathBuf};

/// Resolved paths for one project directory.
///
/// Layout: `<project>/.che/{id, ssh-key.private, ssh-key.public, workspaces/}`
/// next to an optional `<project>/Chefile`.
#[derive(Debug, Clone)]
pub struct DirLayout {
    project_dir: PathBuf,
    folder_name: String,
}

impl DirLayout {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let folder_name = project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        Self {
            project_dir,
            folder_name,
        }
    }

    /// The project directory this instance operates on.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Base name of the project directory, used as the default project
    /// name inside the workspace.
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    pub fn chefile(&self) -> PathBuf {
        self.project_dir.join("Chefile")
    }

    pub fn che_dir(&self) -> PathBuf {
        self.project_dir.join(".che")
    }

    pub fn id_file(&self) -> PathBuf {
        self.che_dir().join("id")
    }

    pub fn ssh_private_key(&self) -> PathBuf {
        self.che_dir().join("ssh-key.private")
    }

    pub fn ssh_public_key(&self) -> PathBuf {
        self.che_dir().join("ssh-key.public")
    }

    pub fn workspaces_dir(&self) -> PathBuf {
        self.che_dir().join("workspaces")
    }

    pub fn dockerfile(&self) -> PathBuf {
        self.project_dir.join("Dockerfile")
    }

    pub fn git_config(&self) -> PathBuf {
        self.project_dir.join(".git").join("config")
    }

    /// Whether `init` has already been run here.
    pub fn is_initialized(&self) -> bool {
        self.che_dir().is_dir()
    }
}
