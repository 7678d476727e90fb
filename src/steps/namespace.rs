// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Idempotent namespace create-or-select.

use serde::Serialize;
use tracing::info;

use crate::cluster::{argv, query, ClusterCli};
use crate::config::SmokeConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceAction {
    Created,
    Existing,
}

impl std::fmt::Display for NamespaceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Existing => write!(f, "existing"),
        }
    }
}

/// `label namespace` arguments applying the configured label set.
pub fn label_args(config: &SmokeConfig) -> Vec<String> {
    let mut args = argv(&["label", "namespace", config.namespace.as_str()]);
    args.extend(
        config
            .namespace_labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v)),
    );
    args.push("--overwrite".to_string());
    args
}

pub async fn namespace_exists(cli: &dyn ClusterCli, namespace: &str) -> Result<bool> {
    let output = query(
        cli,
        &["get", "namespace", namespace, "--ignore-not-found", "-o", "name"],
    )
    .await?;
    Ok(!output.is_empty())
}

/// Create the namespace if absent, converge its labels and select it.
pub async fn ensure_namespace(cli: &dyn ClusterCli, config: &SmokeConfig) -> Result<NamespaceAction> {
    let ns = config.namespace.as_str();

    let action = if namespace_exists(cli, ns).await? {
        NamespaceAction::Existing
    } else {
        cli.run(&argv(&["create", "namespace", ns]), None).await?;
        NamespaceAction::Created
    };

    if !config.namespace_labels.is_empty() {
        cli.run(&label_args(config), None).await?;
    }
    cli.run(&argv(&["project", ns]), None).await?;

    info!(namespace = ns, %action, "namespace ready");
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_args_overwrite_all_labels() {
        let config = SmokeConfig::default();
        let args = label_args(&config);

        assert_eq!(&args[..3], &argv(&["label", "namespace", "hybrid-smoke"])[..]);
        assert_eq!(args.last().map(String::as_str), Some("--overwrite"));
        assert!(args.contains(&"pod-security.kubernetes.io/enforce=privileged".to_string()));
        assert!(args.contains(&"security.openshift.io/scc.podSecurityLabelSync=false".to_string()));
        assert_eq!(args.len(), 3 + config.namespace_labels.len() + 1);
    }
}
