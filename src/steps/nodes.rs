// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Node readiness check.

use serde::Serialize;
use tracing::info;

use crate::cluster::{query, ClusterCli};
use crate::config::SmokeConfig;
use crate::error::{Result, SmokeError};
use crate::k8s::profiles::WorkloadOs;
use crate::poller::parse_count;

/// One line per node holding its `Ready` condition status.
pub const READY_CONDITION_JSONPATH: &str =
    "jsonpath={range .items[*]}{.status.conditions[?(@.type=='Ready')].status}{\"\\n\"}{end}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub windows_ready: u32,
    pub linux_ready: u32,
}

/// Count nodes whose `Ready` condition is `True`.
pub fn count_ready(output: &str) -> u32 {
    output.lines().filter(|line| line.trim() == "True").count() as u32
}

/// Ready nodes of one OS.
pub async fn ready_node_count(cli: &dyn ClusterCli, os: WorkloadOs) -> Result<u32> {
    let selector = os.node_label_selector();
    let output = query(
        cli,
        &["get", "nodes", "-l", selector.as_str(), "-o", READY_CONDITION_JSONPATH],
    )
    .await?;
    Ok(count_ready(&output))
}

/// Ready replicas of a machineset.
pub async fn machineset_ready_replicas(cli: &dyn ClusterCli, namespace: &str, name: &str) -> Result<u32> {
    let output = query(
        cli,
        &[
            "get",
            "machineset",
            name,
            "-n",
            namespace,
            "-o",
            "jsonpath={.status.readyReplicas}",
        ],
    )
    .await?;
    parse_count(&format!("machineset/{}", name), &output)
}

/// Wait for Windows capacity, then check Linux workers once.
pub async fn check_nodes(cli: &dyn ClusterCli, config: &SmokeConfig) -> Result<NodeSummary> {
    let nodes = &config.nodes;
    let poller = config.node_poller();

    if let Some(ref machineset) = nodes.windows_machineset {
        poller
            .wait_for(
                &format!("machineset/{}", machineset),
                nodes.expected_windows,
                || machineset_ready_replicas(cli, &nodes.machine_api_namespace, machineset),
            )
            .await?;
    }

    let windows_ready = poller
        .wait_for("windows nodes", nodes.expected_windows, || {
            ready_node_count(cli, WorkloadOs::Windows)
        })
        .await?;

    let linux_ready = ready_node_count(cli, WorkloadOs::Linux).await?;
    if linux_ready < nodes.expected_linux {
        return Err(SmokeError::NotReady {
            resource: "linux worker nodes".to_string(),
            observed: linux_ready,
            expected: nodes.expected_linux,
        });
    }

    info!(windows_ready, linux_ready, "nodes ready");
    Ok(NodeSummary {
        windows_ready,
        linux_ready,
    })
}
