//! Docker command abstraction.
//!
//! A small fluent builder over the `docker` CLI with three execution
//! modes: captured stdout for probes, combined output for sandboxed
//! tools, and streamed output for long-running launcher invocations.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};

use tracing::debug;

use che_core::error::{CheError, Result};

/// Builder for docker invocations with consistent error handling.
#[derive(Debug, Clone, Default)]
pub struct DockerCommand {
    args: Vec<String>,
}

impl DockerCommand {
    pub fn new(subcommand: &str) -> Self {
        Self {
            args: vec![subcommand.to_string()],
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds `--env KEY=VALUE` to a `docker run` invocation.
    pub fn env(self, key: &str, value: &str) -> Self {
        self.arg("--env").arg(format!("{key}={value}"))
    }

    /// Adds `-v HOST:CONTAINER` to a `docker run` invocation.
    pub fn volume(self, spec: &str) -> Self {
        self.arg("-v").arg(spec.to_string())
    }

    /// Runs the command and returns trimmed stdout; any non-zero exit
    /// is an error carrying stderr.
    pub fn execute_with_output(self) -> Result<String> {
        debug!("Executing docker command: docker {}", self.args.join(" "));
        let output = Command::new("docker")
            .args(&self.args)
            .output()
            .map_err(|e| CheError::Process(format!("Failed to execute docker: {e}")))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(CheError::Process(format!(
                "docker {} failed with status {}: {}",
                self.args.first().cloned().unwrap_or_default(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    /// Runs the command and returns combined stdout+stderr regardless of
    /// exit status, for tools whose useful output lands on either stream.
    pub fn execute_combined_output(self) -> Result<String> {
        debug!("Executing docker command: docker {}", self.args.join(" "));
        let output = Command::new("docker")
            .args(&self.args)
            .output()
            .map_err(|e| CheError::Process(format!("Failed to execute docker: {e}")))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            Err(CheError::Process(format!(
                "docker exited with status {}. Output was:\n{}",
                output.status, combined
            )))
        }
    }

    /// Runs the command, forwarding stdout lines to debug logging as
    /// they arrive while retaining everything for error reporting.
    /// Success is exit code 0; failure carries the exit code plus the
    /// full captured stdout and stderr.
    pub fn execute_streaming(self) -> Result<()> {
        debug!("Executing docker command: docker {}", self.args.join(" "));
        let mut child = Command::new("docker")
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CheError::Process(format!("Failed to execute docker: {e}")))?;

        let stdout = child.stdout.take();
        let reader = std::thread::spawn(move || {
            let mut collected = String::new();
            if let Some(stdout) = stdout {
                for line in BufReader::new(stdout).lines().map_while(|l| l.ok()) {
                    debug!("{}", line);
                    collected.push_str(&line);
                    collected.push('\n');
                }
            }
            collected
        });

        let mut stderr_buf = String::new();
        if let Some(mut stderr) = child.stderr.take() {
            let _ = stderr.read_to_string(&mut stderr_buf);
        }

        let status = child
            .wait()
            .map_err(|e| CheError::Process(format!("Failed to wait for docker: {e}")))?;
        let stdout_buf = reader.join().unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(CheError::Process(format!(
                "docker exited with status {}.\nstdout:\n{}\nstderr:\n{}",
                status,
                stdout_buf.trim_end(),
                stderr_buf.trim_end()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_flags_in_order() {
        let cmd = DockerCommand::new("run")
            .arg("--rm")
            .env("CHE_PORT", "8080")
            .volume("/var/run/docker.sock:/var/run/docker.sock")
            .arg("eclipse/che-launcher:latest")
            .arg("start");

        assert_eq!(
            cmd.args,
            vec![
                "run",
                "--rm",
                "--env",
                "CHE_PORT=8080",
                "-v",
                "/var/run/docker.sock:/var/run/docker.sock",
                "eclipse/che-launcher:latest",
                "start",
            ]
        );
    }
}
