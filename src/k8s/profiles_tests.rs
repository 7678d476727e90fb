// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for Windows/Linux scheduling profiles.

use super::*;

#[test]
fn test_windows_profile_has_os_toleration() {
    let profile = WorkloadOs::Windows.to_profile();
    assert_eq!(profile.node_selector.get(OS_LABEL).map(String::as_str), Some("windows"));
    assert_eq!(profile.tolerations.len(), 1);
    assert_eq!(profile.tolerations[0].key, "os");
    assert_eq!(profile.tolerations[0].value, "Windows");
    assert_eq!(profile.tolerations[0].effect, "NoSchedule");
    assert_eq!(profile.pod_os.name, "windows");
}

#[test]
fn test_linux_profile_no_tolerations() {
    let profile = WorkloadOs::Linux.to_profile();
    assert_eq!(profile.node_selector.get(OS_LABEL).map(String::as_str), Some("linux"));
    assert!(profile.tolerations.is_empty());
    assert_eq!(profile.pod_os.name, "linux");
}

#[test]
fn test_node_label_selectors() {
    assert_eq!(
        WorkloadOs::Windows.node_label_selector(),
        "kubernetes.io/os=windows"
    );
    assert_eq!(
        WorkloadOs::Linux.node_label_selector(),
        "kubernetes.io/os=linux,node-role.kubernetes.io/worker"
    );
}

#[test]
fn test_workload_os_display_and_serde() {
    assert_eq!(WorkloadOs::Windows.to_string(), "windows");
    assert_eq!(serde_json::to_string(&WorkloadOs::Linux).unwrap(), "\"linux\"");
}
