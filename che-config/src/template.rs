//! Default Chefile generation.
//!
//! `init` writes this template when no Chefile exists so the user gets a
//! working starting point: one example command and two example post-load
//! actions (a command reference and an inline script). The output is
//! plain assignment statements, so it round-trips through the
//! interpreter on the next invocation.

use crate::model::{CommandConfig, LoadAction, ServerConfig, ServerType, WorkspaceConfig};

pub const EXAMPLE_COMMAND_NAME: &str = "my-first-command";
pub const EXAMPLE_COMMAND_LINE: &str = "echo this is my first command && read";
pub const EXAMPLE_SCRIPT: &str =
    "echo 'this is my custom command' && while true; do echo $(date); sleep 1; done";

/// Renders the default Chefile for the given configuration.
///
/// The server ip is deliberately omitted so a shared Chefile keeps
/// auto-detecting the host on every machine it lands on.
pub fn default_chefile(server: &ServerConfig, workspace: &WorkspaceConfig) -> String {
    let mut seeded = workspace.clone();
    seeded.commands.push(CommandConfig {
        name: EXAMPLE_COMMAND_NAME.to_string(),
        command_type: "custom".to_string(),
        command_line: EXAMPLE_COMMAND_LINE.to_string(),
        preview_url: String::new(),
    });
    seeded.postload.push(LoadAction {
        command: Some(EXAMPLE_COMMAND_NAME.to_string()),
        script: None,
    });
    seeded.postload.push(LoadAction {
        command: None,
        script: Some(EXAMPLE_SCRIPT.to_string()),
    });
    seeded.compact();

    let mut out = String::new();
    let server_type = match server.server_type {
        ServerType::Local => "local",
        ServerType::Remote => "remote",
    };
    push_str_line(&mut out, "che.server.type", server_type);
    push_raw_line(&mut out, "che.server.port", &server.port.to_string());
    for (key, value) in &server.properties {
        push_str_line(&mut out, &format!("che.server.properties.{key}"), value);
    }

    push_str_line(&mut out, "workspace.name", &seeded.name);
    push_raw_line(&mut out, "workspace.ram", &seeded.ram.to_string());

    for (i, command) in seeded.commands.iter().enumerate() {
        push_str_line(&mut out, &format!("workspace.commands[{i}].name"), &command.name);
        push_str_line(
            &mut out,
            &format!("workspace.commands[{i}].type"),
            &command.command_type,
        );
        push_str_line(
            &mut out,
            &format!("workspace.commands[{i}].commandLine"),
            &command.command_line,
        );
    }

    for (i, action) in seeded.postload.iter().enumerate() {
        if let Some(command) = &action.command {
            push_str_line(
                &mut out,
                &format!("workspace.postload.actions[{i}].command"),
                command,
            );
        }
        if let Some(script) = &action.script {
            push_str_line(
                &mut out,
                &format!("workspace.postload.actions[{i}].script"),
                script,
            );
        }
    }

    out
}

fn push_str_line(out: &mut String, key: &str, value: &str) {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    out.push_str(&format!("{key}=\"{escaped}\"\n"));
}

fn push_raw_line(out: &mut String, key: &str, value: &str) {
    out.push_str(&format!("{key}={value}\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::evaluate;

    #[test]
    fn template_round_trips_through_the_interpreter() {
        let server = ServerConfig::with_defaults("10.1.2.3");
        let workspace = WorkspaceConfig::default();
        let rendered = default_chefile(&server, &workspace);

        let mut parsed_server = ServerConfig::with_defaults("10.1.2.3");
        let mut parsed_ws = WorkspaceConfig::default();
        evaluate(&rendered, &mut parsed_server, &mut parsed_ws).unwrap();
        parsed_ws.compact();

        assert_eq!(parsed_ws.commands.len(), 1);
        assert_eq!(parsed_ws.commands[0].name, EXAMPLE_COMMAND_NAME);
        assert_eq!(parsed_ws.commands[0].command_line, EXAMPLE_COMMAND_LINE);
        assert_eq!(parsed_ws.postload.len(), 2);
        assert_eq!(
            parsed_ws.postload[0].command.as_deref(),
            Some(EXAMPLE_COMMAND_NAME)
        );
        assert_eq!(parsed_ws.postload[1].script.as_deref(), Some(EXAMPLE_SCRIPT));
        assert_eq!(parsed_server.port, server.port);
    }

    #[test]
    fn template_omits_server_ip() {
        let server = ServerConfig::with_defaults("10.1.2.3");
        let rendered = default_chefile(&server, &WorkspaceConfig::default());
        assert!(!rendered.contains("che.server.ip"));
    }
}
