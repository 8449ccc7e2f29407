//! Workspace API trait and its JSON/HTTP implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::dto::{
    CommandDto, EstimateDto, ProjectConfigDto, SourceStorageDto, WorkspaceConfigDto, WorkspaceDto,
};
use che_core::error::{CheError, Result};

/// Everything the lifecycle orchestrator needs from the remote
/// control plane. Kept behind a trait so tests can script responses.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Liveness probe against the workspace endpoint; any 200 counts.
    async fn ping(&self) -> bool;

    /// Looks a workspace up by composite key (`:name`); absence is not
    /// an error, it drives the create-vs-reuse branch.
    async fn find_workspace(&self, key: &str) -> Result<Option<WorkspaceDto>>;

    async fn create_workspace(&self, config: &WorkspaceConfigDto) -> Result<WorkspaceDto>;

    async fn get_workspace(&self, id: &str) -> Result<WorkspaceDto>;

    async fn start_workspace(&self, id: &str) -> Result<WorkspaceDto>;

    async fn stop_workspace(&self, id: &str) -> Result<()>;

    async fn delete_workspace(&self, id: &str) -> Result<()>;

    async fn import_project(
        &self,
        workspace_id: &str,
        name: &str,
        source: &SourceStorageDto,
    ) -> Result<()>;

    /// Asks the server whether the project can be configured with the
    /// given type; `false` means the caller should fall back to blank.
    async fn estimate_project(
        &self,
        workspace_id: &str,
        name: &str,
        project_type: &str,
    ) -> Result<bool>;

    async fn get_project(&self, workspace_id: &str, name: &str) -> Result<ProjectConfigDto>;

    async fn update_project(
        &self,
        workspace_id: &str,
        name: &str,
        project: &ProjectConfigDto,
    ) -> Result<()>;

    /// Submits a command for execution inside a machine on the given
    /// output channel. Returns once the submission is accepted, not
    /// once the command finishes.
    async fn execute_command(
        &self,
        machine_id: &str,
        command: &CommandDto,
        channel: &str,
    ) -> Result<()>;
}

/// JSON/HTTP client over the control-plane REST API.
pub struct HttpWorkspaceApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorkspaceApi {
    pub fn new(ip: &str, port: u16) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{ip}:{port}"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CheError::Api(format!("HTTP {status}: {body}")))
    }
}

#[async_trait]
impl WorkspaceApi for HttpWorkspaceApi {
    async fn ping(&self) -> bool {
        match self.client.get(self.url("/api/workspace")).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!("ping failed, server not reachable: {}", e);
                false
            }
        }
    }

    async fn find_workspace(&self, key: &str) -> Result<Option<WorkspaceDto>> {
        let response = self
            .client
            .get(self.url(&format!("/api/workspace/{key}")))
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        Ok(Some(
            response
                .json()
                .await
                .map_err(|e| CheError::Serialization(e.to_string()))?,
        ))
    }

    async fn create_workspace(&self, config: &WorkspaceConfigDto) -> Result<WorkspaceDto> {
        let response = self
            .client
            .post(self.url("/api/workspace"))
            .json(config)
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| CheError::Serialization(e.to_string()))
    }

    async fn get_workspace(&self, id: &str) -> Result<WorkspaceDto> {
        let response = self
            .client
            .get(self.url(&format!("/api/workspace/{id}")))
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| CheError::Serialization(e.to_string()))
    }

    async fn start_workspace(&self, id: &str) -> Result<WorkspaceDto> {
        let response = self
            .client
            .post(self.url(&format!("/api/workspace/{id}/runtime")))
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| CheError::Serialization(e.to_string()))
    }

    async fn stop_workspace(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/workspace/{id}/runtime")))
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_workspace(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/workspace/{id}")))
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn import_project(
        &self,
        workspace_id: &str,
        name: &str,
        source: &SourceStorageDto,
    ) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!(
                "/api/project/import/{name}?workspace={workspace_id}"
            )))
            .json(source)
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn estimate_project(
        &self,
        workspace_id: &str,
        name: &str,
        project_type: &str,
    ) -> Result<bool> {
        let response = self
            .client
            .get(self.url(&format!(
                "/api/project/estimate/{name}?type={project_type}&workspace={workspace_id}"
            )))
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        let response = Self::check(response).await?;
        let estimate: EstimateDto = response
            .json()
            .await
            .map_err(|e| CheError::Serialization(e.to_string()))?;
        Ok(estimate.matched)
    }

    async fn get_project(&self, workspace_id: &str, name: &str) -> Result<ProjectConfigDto> {
        let response = self
            .client
            .get(self.url(&format!("/api/project/{name}?workspace={workspace_id}")))
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| CheError::Serialization(e.to_string()))
    }

    async fn update_project(
        &self,
        workspace_id: &str,
        name: &str,
        project: &ProjectConfigDto,
    ) -> Result<()> {
        let response = self
            .client
            .put(self.url(&format!("/api/project/{name}?workspace={workspace_id}")))
            .json(project)
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn execute_command(
        &self,
        machine_id: &str,
        command: &CommandDto,
        channel: &str,
    ) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!(
                "/api/machine/{machine_id}/command?outputChannel={channel}"
            )))
            .json(command)
            .send()
            .await
            .map_err(|e| CheError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }
}
