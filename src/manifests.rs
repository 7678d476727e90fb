// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Manifest templates for the smoke test objects.
//!
//! Selectors use only the `app` label. The per-run label lives on object
//! metadata only, so re-applying over a previous run neither touches the
//! immutable selector nor changes the pod template.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{SmokeConfig, WorkloadConfig};
use crate::error::Result;
use crate::k8s::profiles::WorkloadOs;
use crate::k8s::types::{
    ConfigMap, ConfigMapKeySelector, Container, ContainerPort, Deployment, DeploymentSpec,
    EnvVar, EnvVarSource, LabelSelector, Labels, Namespace, ObjectMeta, PodSpec,
    PodTemplateSpec, Probe, TcpSocketAction, TemplateMeta,
};

pub const PART_OF_LABEL: &str = "app.kubernetes.io/part-of";
pub const PART_OF_VALUE: &str = "hybrid-smoke";
pub const RUN_ID_LABEL: &str = "hybrid-smoke/run-id";
pub const APP_LABEL: &str = "app";

/// In-cluster registry serving image streams with a local reference policy.
pub const INTERNAL_REGISTRY: &str = "image-registry.openshift-image-registry.svc:5000";

/// ConfigMap key holding the message both workloads serve.
pub const MESSAGE_KEY: &str = "message";
pub const CLUSTER_MODE_KEY: &str = "cluster-mode";
/// Environment variable the workloads read the message from.
pub const MESSAGE_ENV: &str = "SMOKE_MESSAGE";

/// Labels stamped on every object created by a run.
pub fn common_labels(run_id: &str) -> Labels {
    let mut labels = Labels::new();
    labels.insert(PART_OF_LABEL.to_string(), PART_OF_VALUE.to_string());
    labels.insert(RUN_ID_LABEL.to_string(), run_id.to_string());
    labels
}

fn meta(name: &str, namespace: &str, labels: Labels) -> ObjectMeta {
    ObjectMeta {
        name: name.to_string(),
        namespace: Some(namespace.to_string()),
        labels,
    }
}

/// Declarative form of the namespace, for `manifests` output.
pub fn namespace(config: &SmokeConfig, run_id: &str) -> Namespace {
    let mut labels = common_labels(run_id);
    labels.extend(config.namespace_labels.clone());
    Namespace {
        api_version: "v1".to_string(),
        kind: "Namespace".to_string(),
        metadata: ObjectMeta {
            name: config.namespace.clone(),
            namespace: None,
            labels,
        },
    }
}

pub fn config_map(config: &SmokeConfig, run_id: &str) -> ConfigMap {
    let mut data = BTreeMap::new();
    data.insert(MESSAGE_KEY.to_string(), config.config_map.message.clone());
    data.insert(CLUSTER_MODE_KEY.to_string(), "disconnected".to_string());

    ConfigMap {
        api_version: "v1".to_string(),
        kind: "ConfigMap".to_string(),
        metadata: meta(&config.config_map.name, &config.namespace, common_labels(run_id)),
        data,
    }
}

/// PowerShell HTTP listener serving the ConfigMap message.
pub fn windows_listener_script(port: u16) -> String {
    format!(
        "$listener = New-Object System.Net.HttpListener; \
         $listener.Prefixes.Add('http://*:{port}/'); \
         $listener.Start(); \
         Write-Host('Listening at http://*:{port}/'); \
         while ($listener.IsListening) {{ \
         $context = $listener.GetContext(); \
         $response = $context.Response; \
         $content = [System.Text.Encoding]::UTF8.GetBytes(\"<html><body><h1>Windows Container Web Server</h1><p>$env:{env}</p></body></html>\"); \
         $response.ContentLength64 = $content.Length; \
         $response.OutputStream.Write($content, 0, $content.Length); \
         $response.Close() }}",
        port = port,
        env = MESSAGE_ENV,
    )
}

fn message_env(config: &SmokeConfig) -> EnvVar {
    EnvVar {
        name: MESSAGE_ENV.to_string(),
        value_from: EnvVarSource {
            config_map_key_ref: ConfigMapKeySelector {
                name: config.config_map.name.clone(),
                key: MESSAGE_KEY.to_string(),
            },
        },
    }
}

fn deployment(
    config: &SmokeConfig,
    run_id: &str,
    workload: &WorkloadConfig,
    os: WorkloadOs,
    container: Container,
) -> Deployment {
    let profile = os.to_profile();

    let mut selector = Labels::new();
    selector.insert(APP_LABEL.to_string(), workload.name.clone());

    // The pod template must not change between runs, or every re-run rolls out.
    let mut template_labels = selector.clone();
    template_labels.insert(PART_OF_LABEL.to_string(), PART_OF_VALUE.to_string());

    let mut labels = common_labels(run_id);
    labels.extend(selector.clone());

    Deployment {
        api_version: "apps/v1".to_string(),
        kind: "Deployment".to_string(),
        metadata: meta(&workload.name, &config.namespace, labels),
        spec: DeploymentSpec {
            replicas: workload.replicas,
            selector: LabelSelector {
                match_labels: selector,
            },
            template: PodTemplateSpec {
                metadata: TemplateMeta {
                    labels: template_labels,
                },
                spec: PodSpec {
                    os: Some(profile.pod_os),
                    node_selector: profile.node_selector,
                    tolerations: profile.tolerations,
                    containers: vec![container],
                },
            },
        },
    }
}

fn web_container(name: &str, image: &str, port: u16, initial_delay_seconds: u32) -> Container {
    Container {
        name: name.to_string(),
        image: image.to_string(),
        command: vec![],
        args: vec![],
        ports: vec![ContainerPort {
            container_port: port,
            protocol: "TCP".to_string(),
        }],
        env: vec![],
        readiness_probe: Some(Probe {
            tcp_socket: TcpSocketAction { port },
            initial_delay_seconds,
            period_seconds: 10,
        }),
    }
}

/// Windows web server pulled straight from the mirror registry.
pub fn windows_deployment(config: &SmokeConfig, run_id: &str) -> Deployment {
    let workload = &config.windows;
    let mut container = web_container(&workload.name, &config.windows_image(), workload.port, 10);
    container.command = vec![
        "powershell.exe".to_string(),
        "-command".to_string(),
        windows_listener_script(workload.port),
    ];
    container.env = vec![message_env(config)];

    deployment(config, run_id, workload, WorkloadOs::Windows, container)
}

/// Linux web server running the image stream's image.
pub fn linux_deployment(config: &SmokeConfig, run_id: &str, image: &str) -> Deployment {
    let workload = &config.linux;
    let mut container = web_container(&workload.name, image, workload.port, 5);
    container.env = vec![message_env(config)];

    deployment(config, run_id, workload, WorkloadOs::Linux, container)
}

/// Pull spec the Linux image stream resolves to on a default install.
pub fn expected_internal_image(config: &SmokeConfig) -> String {
    format!(
        "{}/{}/{}:{}",
        INTERNAL_REGISTRY, config.namespace, config.image.stream, config.image.linux_tag
    )
}

/// Every manifest of a run as one `v1/List`, without touching the cluster.
pub fn render_all(config: &SmokeConfig, run_id: &str) -> Result<String> {
    let list = serde_json::json!({
        "apiVersion": "v1",
        "kind": "List",
        "items": [
            namespace(config, run_id),
            config_map(config, run_id),
            windows_deployment(config, run_id),
            linux_deployment(config, run_id, &expected_internal_image(config)),
        ],
    });
    Ok(serde_json::to_string_pretty(&list)?)
}

/// Serialize a manifest for `apply -f -`.
pub fn to_json<T: Serialize>(manifest: &T) -> Result<String> {
    Ok(serde_json::to_string(manifest)?)
}

#[cfg(test)]
#[path = "manifests_tests.rs"]
mod tests;
