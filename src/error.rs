// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Crate-wide error type and exit code mapping.

use thiserror::Error;

use crate::k8s::validation::ValidationError;

/// Process exit codes reported by the binary.
pub mod exit {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
    pub const CONFIG: u8 = 2;
    pub const CLI_UNAVAILABLE: u8 = 3;
    pub const TIMEOUT: u8 = 4;
}

#[derive(Error, Debug)]
pub enum SmokeError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} {args} failed (exit {code:?}): {stderr}")]
    CommandFailed {
        program: String,
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} {args} did not finish within {secs}s")]
    CommandTimeout {
        program: String,
        args: String,
        secs: u64,
    },

    #[error("Timed out waiting for {resource} after {attempts} attempts (last observed: {last_observed})")]
    Timeout {
        resource: String,
        attempts: u32,
        last_observed: u32,
    },

    #[error("{resource} not ready: observed {observed}, expected at least {expected}")]
    NotReady {
        resource: String,
        observed: u32,
        expected: u32,
    },

    #[error("Unexpected output from {context}: {output:?}")]
    UnexpectedOutput { context: String, output: String },

    #[error("Pod {pod} of {workload} is on node {node:?}, expected a {os} node")]
    Placement {
        workload: String,
        pod: String,
        node: String,
        os: String,
    },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Manifest encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SmokeError {
    /// Exit code the binary reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Spawn { .. } => exit::CLI_UNAVAILABLE,
            Self::Timeout { .. } | Self::CommandTimeout { .. } => exit::TIMEOUT,
            Self::Validation(_) | Self::Config(_) | Self::ConfigParse(_) => exit::CONFIG,
            Self::CommandFailed { .. }
            | Self::NotReady { .. }
            | Self::UnexpectedOutput { .. }
            | Self::Placement { .. }
            | Self::Json(_)
            | Self::Io(_) => exit::FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, SmokeError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
