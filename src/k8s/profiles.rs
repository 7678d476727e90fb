// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scheduling profiles for Windows and Linux smoke workloads.

use serde::{Deserialize, Serialize};

use super::types::{Labels, PodOs, Toleration};

/// Well-known node label carrying the operating system.
pub const OS_LABEL: &str = "kubernetes.io/os";

/// Worker role label on Linux compute nodes.
pub const WORKER_ROLE_LABEL: &str = "node-role.kubernetes.io/worker";

/// Operating system a workload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadOs {
    Windows,
    Linux,
}

impl std::fmt::Display for WorkloadOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label_value())
    }
}

/// Scheduling constraints derived from a `WorkloadOs`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingProfile {
    pub os: WorkloadOs,
    pub node_selector: Labels,
    pub tolerations: Vec<Toleration>,
    pub pod_os: PodOs,
}

/// Windows nodes are tainted `os=Windows:NoSchedule` by the machine config operator.
fn windows_toleration() -> Toleration {
    Toleration {
        key: "os".to_string(),
        operator: "Equal".to_string(),
        value: "Windows".to_string(),
        effect: "NoSchedule".to_string(),
    }
}

impl WorkloadOs {
    /// Value of the `kubernetes.io/os` label for this OS.
    pub fn label_value(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }

    /// Label selector used to list nodes of this OS.
    ///
    /// Linux selection is restricted to workers so control-plane nodes
    /// are not counted.
    pub fn node_label_selector(&self) -> String {
        match self {
            Self::Windows => format!("{}={}", OS_LABEL, self.label_value()),
            Self::Linux => format!("{}={},{}", OS_LABEL, self.label_value(), WORKER_ROLE_LABEL),
        }
    }

    /// Generate the scheduling profile for this OS.
    pub fn to_profile(&self) -> SchedulingProfile {
        let mut node_selector = Labels::new();
        node_selector.insert(OS_LABEL.to_string(), self.label_value().to_string());

        let tolerations = match self {
            Self::Windows => vec![windows_toleration()],
            Self::Linux => vec![],
        };

        SchedulingProfile {
            os: *self,
            node_selector,
            tolerations,
            pod_os: PodOs {
                name: self.label_value().to_string(),
            },
        }
    }
}

#[cfg(test)]
#[path = "profiles_tests.rs"]
mod tests;
