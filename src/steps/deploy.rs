// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Workload deployment, readiness polling and placement verification.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::cluster::{apply, query, ClusterCli};
use crate::config::SmokeConfig;
use crate::error::{Result, SmokeError};
use crate::k8s::profiles::{WorkloadOs, OS_LABEL};
use crate::k8s::types::{ConfigMap, Deployment};
use crate::manifests::{to_json, APP_LABEL};
use crate::poller::parse_count;

/// `<pod> <node>` per line; `<node>` is empty while unscheduled.
pub const POD_NODE_JSONPATH: &str =
    "jsonpath={range .items[*]}{.metadata.name}{\" \"}{.spec.nodeName}{\"\\n\"}{end}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadSummary {
    pub name: String,
    pub os: WorkloadOs,
    pub ready_replicas: u32,
    /// Pods checked for placement; `None` when verification is disabled.
    pub placed_pods: Option<usize>,
}

/// Apply the ConfigMap both workloads read.
pub async fn apply_config_map(cli: &dyn ClusterCli, config_map: &ConfigMap) -> Result<()> {
    apply(cli, &to_json(config_map)?).await?;
    info!(name = %config_map.metadata.name, "configmap applied");
    Ok(())
}

/// `generation/observedGeneration/replicas/updatedReplicas/readyReplicas`.
/// Unset fields print nothing.
pub const ROLLOUT_JSONPATH: &str = "jsonpath={.metadata.generation}/{.status.observedGeneration}/\
{.status.replicas}/{.status.updatedReplicas}/{.status.readyReplicas}";

/// Rollout progress of a deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolloutStatus {
    pub generation: u32,
    pub observed_generation: u32,
    pub replicas: u32,
    pub updated_replicas: u32,
    pub ready_replicas: u32,
}

impl RolloutStatus {
    /// Parse `ROLLOUT_JSONPATH` output.
    pub fn parse(context: &str, output: &str) -> Result<Self> {
        let trimmed = output.trim();
        let fields: Vec<&str> = trimmed.split('/').collect();
        if fields.len() != 5 {
            return Err(SmokeError::UnexpectedOutput {
                context: context.to_string(),
                output: trimmed.to_string(),
            });
        }

        Ok(Self {
            generation: parse_count(context, fields[0])?,
            observed_generation: parse_count(context, fields[1])?,
            replicas: parse_count(context, fields[2])?,
            updated_replicas: parse_count(context, fields[3])?,
            ready_replicas: parse_count(context, fields[4])?,
        })
    }

    /// Ready pods known to run the current pod template.
    ///
    /// Zero until the controller has observed the latest spec. Pods still
    /// left over from an older template are assumed to be among the ready.
    pub fn current_ready(&self) -> u32 {
        if self.observed_generation < self.generation {
            return 0;
        }
        let outdated = self.replicas.saturating_sub(self.updated_replicas);
        self.ready_replicas
            .saturating_sub(outdated)
            .min(self.updated_replicas)
    }
}

/// Ready replicas of a deployment's current rollout.
pub async fn rollout_ready_replicas(cli: &dyn ClusterCli, namespace: &str, name: &str) -> Result<u32> {
    let output = query(
        cli,
        &["get", "deployment", name, "-n", namespace, "-o", ROLLOUT_JSONPATH],
    )
    .await?;
    let status = RolloutStatus::parse(&format!("deployment/{}", name), &output)?;
    debug!(deployment = name, ?status, "rollout status");
    Ok(status.current_ready())
}

/// Parse `POD_NODE_JSONPATH` output into `(pod, node)` pairs.
pub fn parse_pod_nodes(output: &str) -> Vec<(String, Option<String>)> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let pod = parts.next()?;
            Some((pod.to_string(), parts.next().map(str::to_string)))
        })
        .collect()
}

/// Check every pod of `workload` runs on a node of `os`.
pub async fn verify_placement(
    cli: &dyn ClusterCli,
    namespace: &str,
    workload: &str,
    os: WorkloadOs,
) -> Result<usize> {
    let os_selector = format!("{}={}", OS_LABEL, os.label_value());
    let node_names = query(
        cli,
        &[
            "get",
            "nodes",
            "-l",
            os_selector.as_str(),
            "-o",
            "jsonpath={.items[*].metadata.name}",
        ],
    )
    .await?;
    let os_nodes: HashSet<&str> = node_names.split_whitespace().collect();

    let app_selector = format!("{}={}", APP_LABEL, workload);
    let pod_output = query(
        cli,
        &[
            "get",
            "pods",
            "-n",
            namespace,
            "-l",
            app_selector.as_str(),
            "-o",
            POD_NODE_JSONPATH,
        ],
    )
    .await?;
    let pods = parse_pod_nodes(&pod_output);

    if pods.is_empty() {
        return Err(SmokeError::UnexpectedOutput {
            context: format!("pods of {}", workload),
            output: pod_output,
        });
    }

    for (pod, node) in &pods {
        let on_os_node = node.as_deref().map_or(false, |n| os_nodes.contains(n));
        if !on_os_node {
            return Err(SmokeError::Placement {
                workload: workload.to_string(),
                pod: pod.clone(),
                node: node.clone().unwrap_or_default(),
                os: os.to_string(),
            });
        }
    }

    info!(workload, pods = pods.len(), %os, "placement verified");
    Ok(pods.len())
}

/// Apply a deployment, poll it to the desired replicas and optionally
/// verify placement.
pub async fn deploy_workload(
    cli: &dyn ClusterCli,
    config: &SmokeConfig,
    deployment: &Deployment,
    os: WorkloadOs,
) -> Result<WorkloadSummary> {
    let name = deployment.metadata.name.as_str();
    let ns = config.namespace.as_str();

    apply(cli, &to_json(deployment)?).await?;
    info!(deployment = name, %os, replicas = deployment.spec.replicas, "deployment applied");

    let ready = config
        .workload_poller()
        .wait_for(
            &format!("deployment/{}", name),
            deployment.spec.replicas,
            || rollout_ready_replicas(cli, ns, name),
        )
        .await?;

    let placed_pods = if config.verify_placement {
        Some(verify_placement(cli, ns, name, os).await?)
    } else {
        None
    };

    Ok(WorkloadSummary {
        name: name.to_string(),
        os,
        ready_replicas: ready,
        placed_pods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pod_nodes() {
        let out = "win-webserver-7d9f-abcde winworker-1\nwin-webserver-7d9f-fghij \n\n";
        let pods = parse_pod_nodes(out);
        assert_eq!(pods.len(), 2);
        assert_eq!(pods[0], ("win-webserver-7d9f-abcde".to_string(), Some("winworker-1".to_string())));
        assert_eq!(pods[1], ("win-webserver-7d9f-fghij".to_string(), None));
    }

    #[test]
    fn test_parse_pod_nodes_empty() {
        assert!(parse_pod_nodes("").is_empty());
    }

    fn rollout(output: &str) -> RolloutStatus {
        RolloutStatus::parse("deployment/web", output).unwrap()
    }

    #[test]
    fn test_rollout_parse_unset_fields() {
        let status = rollout("1////\n");
        assert_eq!(status.generation, 1);
        assert_eq!(status.observed_generation, 0);
        assert_eq!(status.current_ready(), 0);
    }

    #[test]
    fn test_rollout_parse_rejects_other_shapes() {
        assert!(RolloutStatus::parse("deployment/web", "1").is_err());
        assert!(RolloutStatus::parse("deployment/web", "1/1/1/x/1").is_err());
    }

    #[test]
    fn test_rollout_settled() {
        assert_eq!(rollout("3/3/2/2/2").current_ready(), 2);
    }

    #[test]
    fn test_rollout_unobserved_generation_counts_nothing() {
        // Old pod is ready, but the new spec has not been picked up yet.
        assert_eq!(rollout("2/1/1/1/1").current_ready(), 0);
    }

    #[test]
    fn test_rollout_old_pod_not_counted() {
        // One old ready pod plus one new pod that is not ready.
        assert_eq!(rollout("2/2/2/1/1").current_ready(), 0);
        // Both ready: the new one must be among them.
        assert_eq!(rollout("2/2/2/1/2").current_ready(), 1);
    }
}
