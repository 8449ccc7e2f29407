//! Central registry for all user-facing message templates.
//!
//! Naming Convention:
//! - `common_*` - shared messages across commands
//! - `{command}_{event}` - command-specific messages (up_*, down_*, ...)
//!
//! Templates use `{variable}` syntax for runtime values, substituted by
//! the `MessageBuilder`.

pub struct Messages {
    // ============================================================================
    // Common Messages (shared across commands)
    // ============================================================================
    pub common_not_initialized: &'static str,
    pub common_not_running: &'static str,
    pub common_usage: &'static str,
    pub common_invalid_command: &'static str,
    pub common_workspace_not_found: &'static str,
    pub common_error: &'static str,

    // ============================================================================
    // Init Messages
    // ============================================================================
    pub init_already_initialized: &'static str,
    pub init_adding_folder: &'static str,
    pub init_generating_chefile: &'static str,

    // ============================================================================
    // Up Messages
    // ============================================================================
    pub up_existing_instance: &'static str,
    pub up_starting: &'static str,
    pub up_running: &'static str,
    pub up_workspace_created: &'static str,
    pub up_workspace_previous_start: &'static str,
    pub up_workspace_booting: &'static str,
    pub up_workspace_booted: &'static str,
    pub up_workspace_connect_to: &'static str,
    pub up_updating_projects: &'static str,
    pub up_import_failed: &'static str,
    pub up_executing_actions: &'static str,
    pub up_ping_timeout: &'static str,
    pub up_ssh_setup_timeout: &'static str,

    // ============================================================================
    // Down / Destroy Messages
    // ============================================================================
    pub down_search: &'static str,
    pub down_found: &'static str,
    pub down_stopping: &'static str,
    pub down_stopped: &'static str,
    pub destroy_workspace_not_existing: &'static str,
    pub destroy_destroying_workspace: &'static str,
    pub destroy_destroyed_workspace: &'static str,

    // ============================================================================
    // Ssh Messages
    // ============================================================================
    pub ssh_agent_disabled: &'static str,
    pub ssh_no_port: &'static str,
    pub ssh_connection_closed: &'static str,
    pub ssh_using_existing_key: &'static str,
    pub ssh_generating_key: &'static str,

    // ============================================================================
    // Status Messages
    // ============================================================================
    pub status_workspace_name: &'static str,
    pub status_workspace_url: &'static str,
    pub status_instance_id: &'static str,

    // ============================================================================
    // Factory Messages
    // ============================================================================
    pub factory_no_git: &'static str,
    pub factory_no_origin: &'static str,
    pub factory_json: &'static str,
}

pub const MESSAGES: Messages = Messages {
    common_not_initialized: "This directory has not been initialized. So, {command} is not available.",
    common_not_running: "No Eclipse Che instance is running.",
    common_usage: "You need to provide an argument to the command: init, up, down, destroy, ssh, status or factory",
    common_invalid_command: "Invalid command given: only init, up, down, destroy, ssh, status and factory commands are supported.",
    common_workspace_not_found: "Eclipse Che is running at {url} but workspace ({name}) has not been found",
    common_error: "Error: {error}",

    init_already_initialized: "Che already initialized",
    init_adding_folder: "Adding {folder} directory",
    init_generating_chefile: "Generating default {chefile}",

    up_existing_instance: "Eclipse Che is already running. Stop it first with the down command before booting a new instance.",
    up_starting: "Starting Eclipse Che...",
    up_running: "Eclipse Che is running at {url}",
    up_workspace_created: "Workspace has been created",
    up_workspace_previous_start: "Reusing workspace from a previous start",
    up_workspace_booting: "Workspace is booting...",
    up_workspace_booted: "Workspace is ready",
    up_workspace_connect_to: "Connect to your workspace at {url}",
    up_updating_projects: "Updating project configuration...",
    up_import_failed: "Unable to import project {name}. Error is: {error}",
    up_executing_actions: "Executing post-load actions...",
    up_ping_timeout: "Timeout for pinging Eclipse Che has been reached. Please check logs.",
    up_ssh_setup_timeout: "Timed out while submitting the SSH key to the workspace.",

    down_search: "Searching for a running Eclipse Che instance...",
    down_found: "Found an instance running at {url}",
    down_stopping: "Stopping Eclipse Che...",
    down_stopped: "Eclipse Che has been stopped",
    destroy_workspace_not_existing: "Workspace ({name}) does not exist, nothing to destroy on the remote side",
    destroy_destroying_workspace: "Destroying workspace ({name})...",
    destroy_destroyed_workspace: "Workspace ({name}) has been destroyed",

    ssh_agent_disabled: "The SSH agent ({agent}) has been disabled for this workspace.",
    ssh_no_port: "No SSH port is exposed by the workspace machine",
    ssh_connection_closed: "Ending ssh connection",
    ssh_using_existing_key: "Using existing ssh key",
    ssh_generating_key: "Generating ssh key",

    status_workspace_name: "Workspace name: {name}",
    status_workspace_url: "Workspace url: {url}",
    status_instance_id: "Instance id: {id}",

    factory_no_git: "Factories are only working if there is a project inside. No git metadata has been found",
    factory_no_origin: "Found a .git/config file but no remote origin found inside.",
    factory_json: "Factory JSON is:\n{json}",
};
