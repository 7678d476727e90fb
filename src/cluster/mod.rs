// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cluster CLI abstraction.
//!
//! Every interaction with the cluster goes through `ClusterCli::run`, which
//! takes the argument vector (without the binary) and optional stdin.

pub mod oc;

use async_trait::async_trait;

use crate::error::Result;

pub use oc::OcCli;

/// Captured output of a successful CLI invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

#[async_trait]
pub trait ClusterCli: Send + Sync {
    /// Run one CLI invocation. A non-zero exit is an error.
    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput>;
}

/// Build an owned argument vector.
pub fn argv<S: AsRef<str>>(parts: &[S]) -> Vec<String> {
    parts.iter().map(|p| p.as_ref().to_string()).collect()
}

/// Run with no stdin and return trimmed stdout.
pub async fn query(cli: &dyn ClusterCli, parts: &[&str]) -> Result<String> {
    let out = cli.run(&argv(parts), None).await?;
    Ok(out.stdout_trimmed().to_string())
}

/// Submit a manifest with `apply -f -`.
pub async fn apply(cli: &dyn ClusterCli, manifest_json: &str) -> Result<CommandOutput> {
    cli.run(&argv(&["apply", "-f", "-"]), Some(manifest_json)).await
}
