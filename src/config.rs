// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Smoke test configuration.
//!
//! Resolution order: built-in defaults, then an optional TOML file
//! (`--config FILE` or `HYBRID_SMOKE_CONFIG`), then environment overrides.
//! Files may be partial; missing keys keep their defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmokeError};
use crate::k8s::profiles::WorkloadOs;
use crate::k8s::validation::{
    validate_image, validate_label_key, validate_label_value, validate_registry,
    validate_resource_name, ValidationError,
};
use crate::poller::ReadinessPoller;

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "HYBRID_SMOKE_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Cluster CLI binary.
    pub oc_bin: String,
    /// Kubeconfig passed as `--kubeconfig`; unset uses the CLI's own resolution.
    pub kubeconfig: Option<String>,
    /// Upper bound for a single CLI invocation.
    pub command_timeout_secs: u64,
    pub namespace: String,
    /// Disconnected registry host, optionally with port and path prefix.
    pub mirror_registry: String,
    /// Pass `--insecure=true` to `import-image`.
    pub insecure_registry: bool,
    /// Check that pods landed on nodes of the expected OS.
    pub verify_placement: bool,
    /// Delete the namespace after a successful run.
    pub cleanup: bool,
    /// Labels (re)applied to the namespace on every run.
    pub namespace_labels: BTreeMap<String, String>,
    pub nodes: NodeConfig,
    pub polling: PollingConfig,
    pub config_map: ConfigMapConfig,
    pub image: ImageConfig,
    pub windows: WorkloadConfig,
    pub linux: WorkloadConfig,
}

/// Node readiness expectations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub expected_windows: u32,
    pub expected_linux: u32,
    /// Windows machineset to wait on before counting nodes.
    pub windows_machineset: Option<String>,
    pub machine_api_namespace: String,
}

/// Fixed-interval polling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_secs: u64,
    pub max_attempts: u32,
    /// Windows nodes take far longer to join than pods take to start.
    pub node_interval_secs: u64,
    pub node_max_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMapConfig {
    pub name: String,
    pub message: String,
}

/// Images pulled from the mirror registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Windows image path under the mirror, including tag.
    pub windows_repository: String,
    /// Linux image path under the mirror, without tag.
    pub linux_repository: String,
    pub linux_tag: String,
    /// ImageStream receiving the Linux image.
    pub stream: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    pub name: String,
    pub replicas: u32,
    pub port: u16,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        let mut namespace_labels = BTreeMap::new();
        for mode in ["enforce", "audit", "warn"] {
            namespace_labels.insert(
                format!("pod-security.kubernetes.io/{}", mode),
                "privileged".to_string(),
            );
        }
        namespace_labels.insert(
            "security.openshift.io/scc.podSecurityLabelSync".to_string(),
            "false".to_string(),
        );

        Self {
            oc_bin: "oc".to_string(),
            kubeconfig: None,
            command_timeout_secs: 120,
            namespace: "hybrid-smoke".to_string(),
            mirror_registry: "mirror.registry.local:5000".to_string(),
            insecure_registry: false,
            verify_placement: true,
            cleanup: false,
            namespace_labels,
            nodes: NodeConfig::default(),
            polling: PollingConfig::default(),
            config_map: ConfigMapConfig::default(),
            image: ImageConfig::default(),
            windows: WorkloadConfig::for_os(WorkloadOs::Windows),
            linux: WorkloadConfig::for_os(WorkloadOs::Linux),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            expected_windows: 1,
            expected_linux: 1,
            windows_machineset: None,
            machine_api_namespace: "openshift-machine-api".to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            max_attempts: 30,
            node_interval_secs: 30,
            node_max_attempts: 40,
        }
    }
}

impl Default for ConfigMapConfig {
    fn default() -> Self {
        Self {
            name: "hybrid-smoke-config".to_string(),
            message: "hello from a disconnected cluster".to_string(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            windows_repository: "windows/servercore:ltsc2022".to_string(),
            linux_repository: "ubi9/httpd-24".to_string(),
            linux_tag: "latest".to_string(),
            stream: "httpd".to_string(),
        }
    }
}

/// Blank name and port are filled per OS once the file is parsed.
impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            replicas: 1,
            port: 0,
        }
    }
}

impl WorkloadConfig {
    pub fn for_os(os: WorkloadOs) -> Self {
        let mut workload = Self::default();
        workload.fill_defaults(os);
        workload
    }

    fn fill_defaults(&mut self, os: WorkloadOs) {
        let (name, port) = match os {
            WorkloadOs::Windows => ("win-webserver", 80),
            WorkloadOs::Linux => ("linux-webserver", 8080),
        };
        if self.name.is_empty() {
            self.name = name.to_string();
        }
        if self.port == 0 {
            self.port = port;
        }
    }
}

impl SmokeConfig {
    /// Load configuration from an optional file plus process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let mut config = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SmokeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Render as TOML, for `config show` and `config defaults`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SmokeError::Config(e.to_string()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        config.windows.fill_defaults(WorkloadOs::Windows);
        config.linux.fill_defaults(WorkloadOs::Linux);
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HYBRID_SMOKE_NAMESPACE") {
            self.namespace = v;
        }
        if let Some(v) = lookup("HYBRID_SMOKE_MIRROR_REGISTRY") {
            self.mirror_registry = v;
        }
        if let Some(v) = lookup("HYBRID_SMOKE_OC_BIN") {
            self.oc_bin = v;
        }
        if let Some(v) = lookup("KUBECONFIG") {
            if !v.is_empty() {
                self.kubeconfig = Some(v);
            }
        }
    }

    /// Full reference of the Windows image in the mirror.
    pub fn windows_image(&self) -> String {
        format!("{}/{}", self.mirror_registry, self.image.windows_repository)
    }

    /// Full reference the Linux image stream imports from.
    pub fn linux_source_image(&self) -> String {
        format!(
            "{}/{}:{}",
            self.mirror_registry, self.image.linux_repository, self.image.linux_tag
        )
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Poller for workload readiness.
    pub fn workload_poller(&self) -> ReadinessPoller {
        ReadinessPoller::new(
            Duration::from_secs(self.polling.interval_secs),
            self.polling.max_attempts,
        )
    }

    /// Poller for node and machineset readiness.
    pub fn node_poller(&self) -> ReadinessPoller {
        ReadinessPoller::new(
            Duration::from_secs(self.polling.node_interval_secs),
            self.polling.node_max_attempts,
        )
    }

    /// Validate every field that reaches the cluster CLI.
    ///
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.oc_bin.trim().is_empty() {
            return Err(ValidationError::EmptyField("oc_bin".to_string()));
        }

        validate_resource_name(&self.namespace, "namespace")?;
        for (key, value) in &self.namespace_labels {
            validate_label_key(key)?;
            validate_label_value(value)?;
        }

        validate_registry(&self.mirror_registry)?;
        validate_image(&self.windows_image())?;
        validate_image(&self.linux_source_image())?;
        validate_resource_name(&self.image.stream, "image.stream")?;
        if self.image.linux_tag.is_empty() {
            return Err(ValidationError::EmptyField("image.linux_tag".to_string()));
        }

        validate_resource_name(&self.config_map.name, "config_map.name")?;
        validate_resource_name(&self.windows.name, "windows.name")?;
        validate_resource_name(&self.linux.name, "linux.name")?;
        if self.windows.name == self.linux.name {
            return Err(ValidationError::InvalidName {
                field: "linux.name".to_string(),
                value: format!("{} (same as windows.name)", self.linux.name),
            });
        }

        if let Some(ref ms) = self.nodes.windows_machineset {
            validate_resource_name(ms, "nodes.windows_machineset")?;
        }
        validate_resource_name(&self.nodes.machine_api_namespace, "nodes.machine_api_namespace")?;

        let minimums: [(&str, u64); 6] = [
            ("command_timeout_secs", self.command_timeout_secs),
            ("polling.max_attempts", self.polling.max_attempts as u64),
            ("polling.node_max_attempts", self.polling.node_max_attempts as u64),
            ("windows.replicas", self.windows.replicas as u64),
            ("linux.replicas", self.linux.replicas as u64),
            ("nodes.expected_windows", self.nodes.expected_windows as u64),
        ];
        for (field, value) in minimums {
            if value == 0 {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    min: 1,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
