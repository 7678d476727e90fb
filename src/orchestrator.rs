// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sequential, fail-fast smoke test runner.
//!
//! Steps run in plan order. The first failing step ends the run; the steps
//! after it are reported as skipped.

use std::time::Instant;

use tracing::{error, info};
use uuid::Uuid;

use crate::cluster::ClusterCli;
use crate::config::SmokeConfig;
use crate::error::Result;
use crate::k8s::profiles::WorkloadOs;
use crate::manifests;
use crate::report::{RunReport, Step, StepStatus};
use crate::steps::{self, image, WorkloadSummary};

/// Full run: nodes, namespace, configmap, image, Windows then Linux workload.
pub fn full_plan(config: &SmokeConfig) -> Vec<Step> {
    let mut plan = vec![
        Step::Nodes,
        Step::Namespace,
        Step::ConfigMap,
        Step::ImportImage,
        Step::WindowsWorkload,
        Step::LinuxWorkload,
    ];
    if config.cleanup {
        plan.push(Step::Cleanup);
    }
    plan
}

/// Steps run by a CLI command. `run` and unknown names get the full plan.
pub fn command_plan(command: &str, config: &SmokeConfig) -> Vec<Step> {
    match command {
        "nodes" => vec![Step::Nodes],
        "namespace" => vec![Step::Namespace],
        "image" => vec![Step::Namespace, Step::ImportImage],
        "cleanup" => vec![Step::Cleanup],
        _ => full_plan(config),
    }
}

pub struct SmokeTest<'a> {
    cli: &'a dyn ClusterCli,
    config: &'a SmokeConfig,
    run_id: String,
}

impl<'a> SmokeTest<'a> {
    pub fn new(cli: &'a dyn ClusterCli, config: &'a SmokeConfig) -> Self {
        Self {
            cli,
            config,
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Execute `plan` in order, stopping at the first error.
    pub async fn run(&self, plan: &[Step]) -> RunReport {
        let mut report = RunReport::new(&self.run_id, &self.config.namespace);
        let mut linux_image: Option<String> = None;

        info!(run_id = %self.run_id, namespace = %self.config.namespace, steps = plan.len(), "smoke test starting");

        for (i, step) in plan.iter().enumerate() {
            let start = Instant::now();
            info!(step = %step, "step starting");

            let outcome = self.execute(*step, &mut linux_image).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(detail) => {
                    info!(step = %step, elapsed_ms, "step passed");
                    report.record(*step, StepStatus::Passed, detail, elapsed_ms);
                }
                Err(e) => {
                    error!(step = %step, error = %e, "step failed");
                    report.record(*step, StepStatus::Failed, e.to_string(), elapsed_ms);
                    for skipped in &plan[i + 1..] {
                        report.record(*skipped, StepStatus::Skipped, String::new(), 0);
                    }
                    report.fail(e);
                    break;
                }
            }
        }

        report.finish();
        report
    }

    async fn execute(&self, step: Step, linux_image: &mut Option<String>) -> Result<String> {
        let cli = self.cli;
        let config = self.config;

        match step {
            Step::Nodes => {
                let summary = steps::check_nodes(cli, config).await?;
                Ok(format!(
                    "{} windows / {} linux nodes ready",
                    summary.windows_ready, summary.linux_ready
                ))
            }
            Step::Namespace => {
                let action = steps::ensure_namespace(cli, config).await?;
                Ok(format!("{} ({})", config.namespace, action))
            }
            Step::ConfigMap => {
                let cm = manifests::config_map(config, &self.run_id);
                steps::apply_config_map(cli, &cm).await?;
                Ok(cm.metadata.name)
            }
            Step::ImportImage => {
                let pull_spec = steps::import_image(cli, config).await?;
                *linux_image = Some(pull_spec.clone());
                Ok(pull_spec)
            }
            Step::WindowsWorkload => {
                let deployment = manifests::windows_deployment(config, &self.run_id);
                let summary =
                    steps::deploy_workload(cli, config, &deployment, WorkloadOs::Windows).await?;
                Ok(describe(&summary))
            }
            Step::LinuxWorkload => {
                let image = match linux_image {
                    Some(spec) => spec.clone(),
                    None => image::resolve_pull_spec(cli, config).await?,
                };
                let deployment = manifests::linux_deployment(config, &self.run_id, &image);
                let summary =
                    steps::deploy_workload(cli, config, &deployment, WorkloadOs::Linux).await?;
                Ok(describe(&summary))
            }
            Step::Cleanup => {
                steps::delete_namespace(cli, &config.namespace).await?;
                Ok(format!("{} deleted", config.namespace))
            }
        }
    }
}

fn describe(summary: &WorkloadSummary) -> String {
    match summary.placed_pods {
        Some(pods) => format!(
            "{}: {} ready, {} pods on {} nodes",
            summary.name, summary.ready_replicas, pods, summary.os
        ),
        None => format!("{}: {} ready", summary.name, summary.ready_replicas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_plan_order() {
        let mut config = SmokeConfig::default();
        assert_eq!(
            full_plan(&config),
            vec![
                Step::Nodes,
                Step::Namespace,
                Step::ConfigMap,
                Step::ImportImage,
                Step::WindowsWorkload,
                Step::LinuxWorkload,
            ]
        );

        config.cleanup = true;
        assert_eq!(full_plan(&config).last(), Some(&Step::Cleanup));
    }

    #[test]
    fn test_command_plans() {
        let config = SmokeConfig::default();
        assert_eq!(command_plan("nodes", &config), vec![Step::Nodes]);
        assert_eq!(command_plan("namespace", &config), vec![Step::Namespace]);
        assert_eq!(
            command_plan("image", &config),
            vec![Step::Namespace, Step::ImportImage]
        );
        assert_eq!(command_plan("cleanup", &config), vec![Step::Cleanup]);
        assert_eq!(command_plan("run", &config), full_plan(&config));
    }

    #[test]
    fn test_cleanup_command_ignores_cleanup_flag() {
        let mut config = SmokeConfig::default();
        config.cleanup = true;
        assert_eq!(command_plan("nodes", &config), vec![Step::Nodes]);
        assert_eq!(command_plan("cleanup", &config), vec![Step::Cleanup]);
    }
}
