// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! `oc` process runner.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tracing::debug;

use super::{ClusterCli, CommandOutput};
use crate::config::SmokeConfig;
use crate::error::{Result, SmokeError};

/// Spawns the configured CLI binary for each invocation.
#[derive(Debug, Clone)]
pub struct OcCli {
    program: String,
    kubeconfig: Option<String>,
    timeout: Duration,
}

impl OcCli {
    pub fn new(program: impl Into<String>, kubeconfig: Option<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            kubeconfig,
            timeout,
        }
    }

    pub fn from_config(config: &SmokeConfig) -> Self {
        Self::new(
            config.oc_bin.clone(),
            config.kubeconfig.clone(),
            config.command_timeout(),
        )
    }

    /// Full argument vector including the kubeconfig flag.
    pub fn full_args(&self, args: &[String]) -> Vec<String> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(ref kc) = self.kubeconfig {
            full.push("--kubeconfig".to_string());
            full.push(kc.clone());
        }
        full.extend_from_slice(args);
        full
    }

    async fn execute(&self, full: &[String], stdin: Option<&str>) -> Result<std::process::Output> {
        let mut child = Command::new(&self.program)
            .args(full)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SmokeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            // The CLI exited without reading stdin; its exit status is reported below.
            if let Err(e) = write_stdin(&mut pipe, input).await {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
                debug!(program = %self.program, "stdin closed early");
            }
        }

        Ok(child.wait_with_output().await?)
    }
}

async fn write_stdin(pipe: &mut ChildStdin, input: &str) -> io::Result<()> {
    pipe.write_all(input.as_bytes()).await?;
    pipe.shutdown().await
}

#[async_trait]
impl ClusterCli for OcCli {
    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput> {
        let full = self.full_args(args);
        let joined = args.join(" ");
        debug!(program = %self.program, args = %joined, "running");

        let output = tokio::time::timeout(self.timeout, self.execute(&full, stdin))
            .await
            .map_err(|_| SmokeError::CommandTimeout {
                program: self.program.clone(),
                args: joined.clone(),
                secs: self.timeout.as_secs(),
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(SmokeError::CommandFailed {
                program: self.program.clone(),
                args: joined,
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

#[cfg(test)]
#[path = "oc_tests.rs"]
mod tests;
