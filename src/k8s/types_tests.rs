// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for manifest serialization.

use super::*;

fn meta(name: &str) -> ObjectMeta {
    ObjectMeta {
        name: name.to_string(),
        namespace: Some("hybrid-smoke".to_string()),
        labels: Labels::new(),
    }
}

#[test]
fn test_namespace_omits_empty_fields() {
    let ns = Namespace {
        api_version: "v1".to_string(),
        kind: "Namespace".to_string(),
        metadata: ObjectMeta {
            name: "hybrid-smoke".to_string(),
            namespace: None,
            labels: Labels::new(),
        },
    };

    let json = serde_json::to_value(&ns).unwrap();
    assert_eq!(json["apiVersion"], "v1");
    assert_eq!(json["metadata"]["name"], "hybrid-smoke");
    assert!(json["metadata"].get("namespace").is_none());
    assert!(json["metadata"].get("labels").is_none());
}

#[test]
fn test_configmap_data_keys() {
    let mut data = std::collections::BTreeMap::new();
    data.insert("message".to_string(), "hello".to_string());
    data.insert("cluster-mode".to_string(), "disconnected".to_string());
    let cm = ConfigMap {
        api_version: "v1".to_string(),
        kind: "ConfigMap".to_string(),
        metadata: meta("hybrid-smoke-config"),
        data,
    };

    let json = serde_json::to_value(&cm).unwrap();
    assert_eq!(json["data"]["message"], "hello");
    assert_eq!(json["data"]["cluster-mode"], "disconnected");
    assert_eq!(json["metadata"]["namespace"], "hybrid-smoke");
}

#[test]
fn test_container_camel_case_fields() {
    let container = Container {
        name: "web".to_string(),
        image: "mirror.local/ubi9/httpd-24:latest".to_string(),
        command: vec![],
        args: vec![],
        ports: vec![ContainerPort {
            container_port: 8080,
            protocol: "TCP".to_string(),
        }],
        env: vec![EnvVar {
            name: "SMOKE_MESSAGE".to_string(),
            value_from: EnvVarSource {
                config_map_key_ref: ConfigMapKeySelector {
                    name: "hybrid-smoke-config".to_string(),
                    key: "message".to_string(),
                },
            },
        }],
        readiness_probe: Some(Probe {
            tcp_socket: TcpSocketAction { port: 8080 },
            initial_delay_seconds: 5,
            period_seconds: 10,
        }),
    };

    let json = serde_json::to_value(&container).unwrap();
    assert_eq!(json["ports"][0]["containerPort"], 8080);
    assert_eq!(
        json["env"][0]["valueFrom"]["configMapKeyRef"]["key"],
        "message"
    );
    assert_eq!(json["readinessProbe"]["tcpSocket"]["port"], 8080);
    assert!(json.get("command").is_none());
}

#[test]
fn test_toleration_omits_empty_value() {
    let t = Toleration {
        key: "os".to_string(),
        operator: "Exists".to_string(),
        value: String::new(),
        effect: "NoSchedule".to_string(),
    };
    let json = serde_json::to_string(&t).unwrap();
    assert!(!json.contains("value"));

    let back: Toleration = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
}
