// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Individual smoke test steps. Each one is a handful of CLI calls.

pub mod deploy;
pub mod image;
pub mod namespace;
pub mod nodes;

use tracing::info;

use crate::cluster::{argv, ClusterCli};
use crate::error::Result;

pub use deploy::{apply_config_map, deploy_workload, verify_placement, WorkloadSummary};
pub use image::import_image;
pub use namespace::{ensure_namespace, NamespaceAction};
pub use nodes::{check_nodes, NodeSummary};

/// Delete the smoke test namespace without waiting for finalizers.
pub async fn delete_namespace(cli: &dyn ClusterCli, namespace: &str) -> Result<()> {
    cli.run(
        &argv(&["delete", "namespace", namespace, "--ignore-not-found", "--wait=false"]),
        None,
    )
    .await?;
    info!(namespace, "namespace deletion requested");
    Ok(())
}
