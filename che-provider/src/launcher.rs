//! Server launcher: boots and stops the local control-plane container.
//!
//! Both operations delegate to the launcher image (`start` / `stop`
//! argument), which owns the actual server container; this process only
//! assembles the flag list and watches the exit code.

use std::env;

use crate::docker::DockerCommand;
use crate::ServerLauncher;
use che_config::model::ServerConfig;
use che_config::paths::DirLayout;
use che_core::error::Result;

pub const DEFAULT_LAUNCHER_IMAGE: &str = "eclipse/che-launcher";
const DOCKER_SOCK: &str = "/var/run/docker.sock";

/// Docker-backed [`ServerLauncher`].
pub struct DockerLauncher {
    layout: DirLayout,
    server: ServerConfig,
    instance_id: String,
    image: String,
    version: String,
}

impl DockerLauncher {
    /// `version` comes from the startup version probe and pins the
    /// launcher image tag.
    pub fn new(layout: DirLayout, server: ServerConfig, instance_id: &str, version: &str) -> Self {
        let image = env::var("CHE_LAUNCHER_IMAGE_NAME")
            .unwrap_or_else(|_| DEFAULT_LAUNCHER_IMAGE.to_string());
        Self {
            layout,
            server,
            instance_id: instance_id.to_string(),
            image,
            version: version.to_string(),
        }
    }

    /// Fixed container name derived from the persisted instance id.
    pub fn container_name(&self) -> String {
        format!("che-server-{}", self.instance_id)
    }

    fn launcher_command(&self, action: &str) -> DockerCommand {
        let workspaces = self.layout.workspaces_dir();
        let project_volume = format!(
            "{}:/projects/{};{}:{}",
            self.layout.project_dir().display(),
            self.layout.folder_name(),
            DOCKER_SOCK,
            DOCKER_SOCK
        );

        let mut cmd = DockerCommand::new("run")
            .arg("--rm")
            .env("CHE_WORKSPACE_VOLUME", &project_volume)
            .env("CHE_WORKSPACE_STORAGE", &workspaces.display().to_string());

        for (key, value) in &self.server.properties {
            cmd = cmd.env(key, value);
        }

        cmd.volume(&format!("{DOCKER_SOCK}:{DOCKER_SOCK}"))
            .env("CHE_PORT", &self.server.port.to_string())
            .env("CHE_DATA", &workspaces.display().to_string())
            .env("CHE_SERVER_CONTAINER_NAME", &self.container_name())
            .arg(format!("{}:{}", self.image, self.version))
            .arg(action)
    }
}

impl ServerLauncher for DockerLauncher {
    fn boot(&self) -> Result<()> {
        self.launcher_command("start").execute_streaming()
    }

    fn stop(&self) -> Result<()> {
        self.launcher_command("stop").execute_streaming()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use che_config::model::ServerConfig;

    #[test]
    fn container_name_embeds_instance_id() {
        let launcher = DockerLauncher::new(
            DirLayout::new("/work/demo"),
            ServerConfig::with_defaults("10.0.0.2"),
            "abc-123",
            "5.0.0",
        );
        assert_eq!(launcher.container_name(), "che-server-abc-123");
    }
}
