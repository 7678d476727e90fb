// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! hybrid-smoke: end-to-end smoke test for disconnected OpenShift clusters
//! with Windows and Linux workers.
//!
//! The run checks node readiness, ensures a labelled namespace, applies a
//! ConfigMap, imports a mirrored image into an ImageStream, then deploys a
//! Windows and a Linux workload and polls each to readiness. All cluster
//! access goes through the `oc` CLI behind the `ClusterCli` trait.

pub mod cluster;
pub mod config;
pub mod error;
pub mod k8s;
pub mod logging;
pub mod manifests;
pub mod orchestrator;
pub mod poller;
pub mod report;
pub mod steps;

pub use cluster::{ClusterCli, CommandOutput, OcCli};
pub use config::SmokeConfig;
pub use error::{Result, SmokeError};
pub use orchestrator::{command_plan, full_plan, SmokeTest};
pub use poller::ReadinessPoller;
pub use report::{RunReport, Step, StepStatus};
