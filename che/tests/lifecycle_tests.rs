//! End-to-end lifecycle scenarios against mocked collaborators.
//!
//! The mock API records every call so the tests can assert on the
//! exact interaction sequence each command produces.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use che::cli::{Args, Command};
use che::commands::{destroy, down, execute_command, factory, init, ssh, status, up, CommandCtx};
use che_api::dto::{
    CommandDto, EnvironmentDto, LinkDto, MachineConfDto, MachineDto, MachineRuntimeDto,
    ProjectConfigDto, RecipeDto, ServerRefDto, SourceStorageDto, WorkspaceConfigDto, WorkspaceDto,
    WorkspaceRuntimeDto, WorkspaceStatus, DEV_MACHINE_NAME, IDE_URL_REL, SSH_AGENT_ID,
    SSH_SERVER_REF,
};
use che_api::WorkspaceApi;
use che_config::{
    CommandConfig, DirLayout, LoadAction, ProjectSource, ProjectSpec, ServerConfig,
    WorkspaceConfig,
};
use che_core::error::{CheError, Result};
use che_provider::ServerLauncher;

fn running_workspace(id: &str, name: &str, with_ssh_agent: bool) -> WorkspaceDto {
    let mut servers = HashMap::new();
    servers.insert(
        SSH_SERVER_REF.to_string(),
        ServerRefDto {
            address: "127.0.0.1:32768".to_string(),
        },
    );

    let mut machines = HashMap::new();
    machines.insert(
        DEV_MACHINE_NAME.to_string(),
        MachineConfDto {
            agents: if with_ssh_agent {
                vec![SSH_AGENT_ID.to_string()]
            } else {
                vec!["org.eclipse.che.terminal".to_string()]
            },
            attributes: HashMap::new(),
        },
    );

    let mut environments = HashMap::new();
    environments.insert(
        "default".to_string(),
        EnvironmentDto {
            recipe: RecipeDto {
                recipe_type: "dockerimage".to_string(),
                content_type: None,
                content: None,
                location: Some("eclipse/ubuntu_jdk8".to_string()),
            },
            machines,
        },
    );

    WorkspaceDto {
        id: id.to_string(),
        status: WorkspaceStatus::Running,
        config: WorkspaceConfigDto {
            name: name.to_string(),
            default_env: "default".to_string(),
            environments,
            commands: Vec::new(),
            projects: Vec::new(),
        },
        runtime: Some(WorkspaceRuntimeDto {
            dev_machine: MachineDto {
                id: "machine-1".to_string(),
                runtime: Some(MachineRuntimeDto { servers }),
            },
        }),
        links: vec![LinkDto {
            rel: IDE_URL_REL.to_string(),
            href: "http://localhost:8080/ide/local".to_string(),
        }],
    }
}

/// Scripted control-plane double. The ping probe fails for the first
/// `unready_pings` calls and succeeds afterwards.
struct MockApi {
    unready_pings: u32,
    pings: AtomicU32,
    existing: Mutex<Option<WorkspaceDto>>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<WorkspaceConfigDto>>,
    executed: Mutex<Vec<CommandDto>>,
}

impl MockApi {
    fn new(unready_pings: u32, existing: Option<WorkspaceDto>) -> Arc<Self> {
        Arc::new(Self {
            unready_pings,
            pings: AtomicU32::new(0),
            existing: Mutex::new(existing),
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
        })
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn executed(&self) -> Vec<CommandDto> {
        self.executed.lock().unwrap().clone()
    }

    fn created(&self) -> Vec<WorkspaceConfigDto> {
        self.created.lock().unwrap().clone()
    }

    fn ping_count(&self) -> u32 {
        self.pings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkspaceApi for MockApi {
    async fn ping(&self) -> bool {
        let n = self.pings.fetch_add(1, Ordering::SeqCst);
        n >= self.unready_pings
    }

    async fn find_workspace(&self, key: &str) -> Result<Option<WorkspaceDto>> {
        self.record(format!("find {key}"));
        Ok(self.existing.lock().unwrap().clone())
    }

    async fn create_workspace(&self, config: &WorkspaceConfigDto) -> Result<WorkspaceDto> {
        self.record("create");
        self.created.lock().unwrap().push(config.clone());
        let workspace = running_workspace("workspace-1", &config.name, true);
        *self.existing.lock().unwrap() = Some(workspace.clone());
        Ok(workspace)
    }

    async fn get_workspace(&self, id: &str) -> Result<WorkspaceDto> {
        self.record(format!("get {id}"));
        self.existing
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CheError::Api("no such workspace".to_string()))
    }

    async fn start_workspace(&self, id: &str) -> Result<WorkspaceDto> {
        self.record(format!("start {id}"));
        self.existing
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CheError::Api("no such workspace".to_string()))
    }

    async fn stop_workspace(&self, id: &str) -> Result<()> {
        self.record(format!("stop {id}"));
        Ok(())
    }

    async fn delete_workspace(&self, id: &str) -> Result<()> {
        self.record(format!("delete {id}"));
        *self.existing.lock().unwrap() = None;
        Ok(())
    }

    async fn import_project(
        &self,
        _workspace_id: &str,
        name: &str,
        source: &SourceStorageDto,
    ) -> Result<()> {
        self.record(format!("import {name} from {}", source.location));
        Ok(())
    }

    async fn estimate_project(
        &self,
        _workspace_id: &str,
        name: &str,
        project_type: &str,
    ) -> Result<bool> {
        self.record(format!("estimate {name} as {project_type}"));
        Ok(true)
    }

    async fn get_project(&self, _workspace_id: &str, name: &str) -> Result<ProjectConfigDto> {
        self.record(format!("get-project {name}"));
        Ok(ProjectConfigDto {
            name: name.to_string(),
            path: format!("/{name}"),
            project_type: "blank".to_string(),
            source: None,
        })
    }

    async fn update_project(
        &self,
        _workspace_id: &str,
        name: &str,
        project: &ProjectConfigDto,
    ) -> Result<()> {
        self.record(format!("update {name} as {}", project.project_type));
        Ok(())
    }

    async fn execute_command(
        &self,
        _machine_id: &str,
        command: &CommandDto,
        _channel: &str,
    ) -> Result<()> {
        self.record(format!("execute {}", command.name));
        self.executed.lock().unwrap().push(command.clone());
        Ok(())
    }
}

#[derive(Default)]
struct MockLauncher {
    boots: AtomicU32,
    stops: AtomicU32,
}

impl ServerLauncher for MockLauncher {
    fn boot(&self) -> Result<()> {
        self.boots.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn test_ctx(dir: &Path, api: Arc<MockApi>, launcher: Arc<MockLauncher>) -> CommandCtx {
    CommandCtx {
        layout: DirLayout::new(dir),
        server: ServerConfig::with_defaults("127.0.0.1"),
        workspace: WorkspaceConfig::default(),
        instance_id: "11111111-2222-3333-4444-555555555555".to_string(),
        api,
        launcher,
    }
}

/// Prepares an already-initialized directory with a reusable keypair so
/// no container sandbox is needed during the tests.
fn initialized_dir(dir: &Path) {
    let layout = DirLayout::new(dir);
    fs::create_dir_all(layout.workspaces_dir()).unwrap();
    fs::write(layout.ssh_private_key(), "-----PRIVATE KEY-----\n").unwrap();
    fs::write(layout.ssh_public_key(), "ssh-rsa AAAAB3Nza test@local\n").unwrap();
}

#[test]
fn init_creates_the_instance_folder_and_chefile() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(
        dir.path(),
        MockApi::new(0, None),
        Arc::new(MockLauncher::default()),
    );

    assert!(init::handle_init(&ctx).unwrap());

    let layout = DirLayout::new(dir.path());
    assert!(layout.workspaces_dir().is_dir());
    assert_eq!(
        fs::read_to_string(layout.id_file()).unwrap(),
        "11111111-2222-3333-4444-555555555555"
    );
    let chefile = fs::read_to_string(layout.chefile()).unwrap();
    assert!(chefile.contains("my-first-command"));
}

#[test]
fn init_twice_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(
        dir.path(),
        MockApi::new(0, None),
        Arc::new(MockLauncher::default()),
    );

    assert!(init::handle_init(&ctx).unwrap());
    let chefile_before = fs::read_to_string(ctx.layout.chefile()).unwrap();

    assert!(!init::handle_init(&ctx).unwrap());
    assert_eq!(
        fs::read_to_string(ctx.layout.chefile()).unwrap(),
        chefile_before
    );
}

#[tokio::test(start_paused = true)]
async fn up_boots_and_provisions_a_new_workspace() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    // pre-check ping fails, then two readiness attempts before success
    let api = MockApi::new(3, None);
    let launcher = Arc::new(MockLauncher::default());
    let mut ctx = test_ctx(dir.path(), Arc::clone(&api), Arc::clone(&launcher));
    ctx.workspace.commands.push(CommandConfig {
        name: "build".to_string(),
        command_type: "mvn".to_string(),
        command_line: "mvn clean install".to_string(),
        preview_url: String::new(),
    });
    ctx.workspace.postload.push(LoadAction {
        command: Some("build".to_string()),
        script: None,
    });
    ctx.workspace.postload.push(LoadAction {
        command: None,
        script: Some("echo ready".to_string()),
    });

    up::handle_up(&ctx).await.unwrap();

    assert_eq!(launcher.boots.load(Ordering::SeqCst), 1);

    let calls = api.calls();
    assert_eq!(calls.iter().filter(|c| *c == "create").count(), 1);
    assert!(calls.contains(&"start workspace-1".to_string()));

    // the mounted folder becomes the implicit project
    let folder = ctx.layout.folder_name().to_string();
    assert!(calls.contains(&format!("estimate {folder} as blank")));
    assert!(calls.contains(&format!("update {folder} as blank")));

    // one ssh provisioning command plus the two post-load actions
    let executed = api.executed();
    assert_eq!(executed.len(), 3);
    assert_eq!(executed[0].name, "setup ssh");
    assert!(executed[0].command_line.contains("ssh-rsa AAAAB3Nza"));
    assert!(executed[0].command_line.contains("authorized_keys"));
    assert!(executed.iter().any(|c| c.name == "build"));
    assert!(executed
        .iter()
        .any(|c| c.command_line == "echo ready" && c.command_type == "custom"));

    // created config carries the default environment and the command
    let created = api.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].default_env, "default");
    let machine = &created[0].environments["default"].machines[DEV_MACHINE_NAME];
    assert!(machine.agents.iter().any(|a| a == SSH_AGENT_ID));
    assert_eq!(machine.attributes["memoryLimitBytes"], "2147483648");
    assert_eq!(created[0].commands.len(), 1);
    assert_eq!(created[0].commands[0].command_line, "mvn clean install");
}

#[tokio::test(start_paused = true)]
async fn up_imports_declared_projects() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(1, None);
    let mut ctx = test_ctx(dir.path(), Arc::clone(&api), Arc::new(MockLauncher::default()));
    ctx.workspace.projects.push(ProjectSpec {
        name: "spring-demo".to_string(),
        project_type: "maven".to_string(),
        source: ProjectSource {
            location: "https://github.com/spring-projects/spring-petclinic.git".to_string(),
            source_type: String::new(),
            attributes: Default::default(),
        },
    });

    up::handle_up(&ctx).await.unwrap();

    let calls = api.calls();
    assert!(calls.contains(
        &"import spring-demo from https://github.com/spring-projects/spring-petclinic.git"
            .to_string()
    ));
    assert!(calls.contains(&"estimate spring-demo as maven".to_string()));
    assert!(calls.contains(&"update spring-demo as maven".to_string()));
}

#[tokio::test(start_paused = true)]
async fn up_reuses_an_existing_workspace_and_skips_imports() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    // no advertised links: the connect-to url is built locally anyway
    let mut existing = running_workspace("workspace-1", "local", true);
    existing.links.clear();
    let api = MockApi::new(1, Some(existing));
    let launcher = Arc::new(MockLauncher::default());
    let mut ctx = test_ctx(dir.path(), Arc::clone(&api), Arc::clone(&launcher));
    ctx.workspace.postload.push(LoadAction {
        command: None,
        script: Some("echo back again".to_string()),
    });

    up::handle_up(&ctx).await.unwrap();

    assert_eq!(launcher.boots.load(Ordering::SeqCst), 1);
    let calls = api.calls();
    assert!(!calls.iter().any(|c| c == "create"));
    assert!(!calls.iter().any(|c| c.starts_with("import")));
    assert!(!calls.iter().any(|c| c.starts_with("estimate")));

    // ssh provisioning and post-load actions still run on reuse
    let executed = api.executed();
    assert_eq!(executed.len(), 2);
    assert_eq!(executed[0].name, "setup ssh");
    assert_eq!(executed[1].command_line, "echo back again");
}

#[test]
fn connect_to_url_is_built_from_the_display_host() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(
        dir.path(),
        MockApi::new(0, None),
        Arc::new(MockLauncher::default()),
    );
    assert_eq!(
        ctx.local_ide_url(),
        "http://127.0.0.1:8080/dashboard/#/ide/che/local"
    );
}

#[test]
fn connect_to_url_rewrites_the_docker_desktop_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = test_ctx(
        dir.path(),
        MockApi::new(0, None),
        Arc::new(MockLauncher::default()),
    );
    ctx.server.ip = "192.168.65.2".to_string();
    assert_eq!(
        ctx.local_ide_url(),
        "http://localhost:8080/dashboard/#/ide/che/local"
    );
}

#[tokio::test(start_paused = true)]
async fn up_refuses_to_boot_twice() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(0, None);
    let launcher = Arc::new(MockLauncher::default());
    let ctx = test_ctx(dir.path(), Arc::clone(&api), Arc::clone(&launcher));

    let err = up::handle_up(&ctx).await.unwrap_err();
    assert!(err.to_string().contains("already running"));
    assert_eq!(launcher.boots.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn up_times_out_when_the_server_never_answers() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(u32::MAX, None);
    let launcher = Arc::new(MockLauncher::default());
    let ctx = test_ctx(dir.path(), Arc::clone(&api), Arc::clone(&launcher));

    let err = up::handle_up(&ctx).await.unwrap_err();
    assert!(err
        .to_string()
        .contains("Timeout for pinging Eclipse Che has been reached"));
    // one pre-check probe plus the thirty readiness attempts
    assert_eq!(api.ping_count(), 31);
}

#[tokio::test]
async fn down_stops_the_running_container() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(0, None);
    let launcher = Arc::new(MockLauncher::default());
    let ctx = test_ctx(dir.path(), Arc::clone(&api), Arc::clone(&launcher));

    down::handle_down(&ctx).await.unwrap();
    assert_eq!(launcher.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn down_requires_a_running_instance() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(u32::MAX, None);
    let launcher = Arc::new(MockLauncher::default());
    let ctx = test_ctx(dir.path(), api, Arc::clone(&launcher));

    let err = down::handle_down(&ctx).await.unwrap_err();
    assert!(err.to_string().contains("No Eclipse Che instance is running"));
    assert_eq!(launcher.stops.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn down_requires_an_initialized_directory() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = test_ctx(
        dir.path(),
        MockApi::new(0, None),
        Arc::new(MockLauncher::default()),
    );

    let err = down::handle_down(&ctx).await.unwrap_err();
    assert!(err
        .to_string()
        .contains("This directory has not been initialized. So, down is not available."));
}

#[tokio::test]
async fn destroy_deletes_the_workspace_then_stops_the_container() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(0, Some(running_workspace("workspace-1", "local", true)));
    let launcher = Arc::new(MockLauncher::default());
    let ctx = test_ctx(dir.path(), Arc::clone(&api), Arc::clone(&launcher));

    destroy::handle_destroy(&ctx).await.unwrap();

    let calls = api.calls();
    let stop_at = calls.iter().position(|c| c == "stop workspace-1").unwrap();
    let delete_at = calls.iter().position(|c| c == "delete workspace-1").unwrap();
    assert!(stop_at < delete_at);
    assert_eq!(launcher.stops.load(Ordering::SeqCst), 1);
    assert!(api.existing.lock().unwrap().is_none());
}

#[tokio::test]
async fn destroy_without_remote_workspace_still_stops_the_container() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(0, None);
    let launcher = Arc::new(MockLauncher::default());
    let ctx = test_ctx(dir.path(), Arc::clone(&api), Arc::clone(&launcher));

    destroy::handle_destroy(&ctx).await.unwrap();

    let calls = api.calls();
    assert!(calls.contains(&"find :local".to_string()));
    assert!(!calls.iter().any(|c| c.starts_with("delete")));
    assert_eq!(launcher.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn ssh_rejects_a_workspace_without_the_ssh_agent() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(0, Some(running_workspace("workspace-1", "local", false)));
    let ctx = test_ctx(dir.path(), api, Arc::new(MockLauncher::default()));

    let err = ssh::handle_ssh(&ctx).await.unwrap_err();
    assert!(err.to_string().contains("has been disabled"));
}

#[tokio::test]
async fn status_reports_on_the_running_workspace() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(0, Some(running_workspace("workspace-1", "local", true)));
    let ctx = test_ctx(dir.path(), api, Arc::new(MockLauncher::default()));

    status::handle_status(&ctx).await.unwrap();
}

#[tokio::test]
async fn status_fails_when_the_workspace_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let api = MockApi::new(0, None);
    let ctx = test_ctx(dir.path(), api, Arc::new(MockLauncher::default()));

    let err = status::handle_status(&ctx).await.unwrap_err();
    assert!(err.to_string().contains("has not been found"));
}

#[test]
fn factory_requires_git_metadata() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let ctx = test_ctx(
        dir.path(),
        MockApi::new(0, None),
        Arc::new(MockLauncher::default()),
    );

    let err = factory::handle_factory(&ctx).unwrap_err();
    assert!(err.to_string().contains("No git metadata"));
}

#[test]
fn factory_exports_the_origin_remote() {
    let dir = tempfile::tempdir().unwrap();
    initialized_dir(dir.path());

    let git_dir = dir.path().join(".git");
    fs::create_dir_all(&git_dir).unwrap();
    fs::write(
        git_dir.join("config"),
        "[remote \"origin\"]\n\turl = https://github.com/eclipse/che.git\n",
    )
    .unwrap();

    let ctx = test_ctx(
        dir.path(),
        MockApi::new(0, None),
        Arc::new(MockLauncher::default()),
    );

    let factory =
        factory::build_factory(&ctx, "https://github.com/eclipse/che.git".to_string()).unwrap();
    assert_eq!(factory.v, "4.0");
    assert_eq!(factory.workspace.projects.len(), 1);
    let source = factory.workspace.projects[0].source.as_ref().unwrap();
    assert_eq!(source.location, "https://github.com/eclipse/che.git");
    assert_eq!(source.source_type, "git");

    factory::handle_factory(&ctx).unwrap();
}

#[tokio::test]
async fn uninitialized_directory_wins_over_a_broken_chefile() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Chefile"), "this is not an assignment\n").unwrap();
    // keep the dispatcher from probing docker for the release tag
    std::env::set_var("CHE_VERSION", "latest");

    let args = Args {
        command: Command::Down {
            path: Some(dir.path().to_path_buf()),
        },
        verbose: false,
    };
    let err = execute_command(args).await.unwrap_err();
    assert!(err
        .to_string()
        .contains("This directory has not been initialized. So, down is not available."));
}
