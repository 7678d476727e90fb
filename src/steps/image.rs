// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Mirror the Linux image into an in-cluster ImageStream.

use tracing::info;

use crate::cluster::{argv, query, ClusterCli};
use crate::config::SmokeConfig;
use crate::error::{Result, SmokeError};

/// `import-image` arguments. The local reference policy makes pods pull
/// through the internal registry rather than the mirror.
pub fn import_args(config: &SmokeConfig) -> Vec<String> {
    let mut args = argv(&[
        "import-image".to_string(),
        format!("{}:{}", config.image.stream, config.image.linux_tag),
        format!("--from={}", config.linux_source_image()),
        "--confirm".to_string(),
        "--reference-policy=local".to_string(),
        "-n".to_string(),
        config.namespace.clone(),
    ]);
    if config.insecure_registry {
        args.push("--insecure=true".to_string());
    }
    args
}

/// Internal pull spec of the imported tag.
///
/// Fails when the stream has no internal repository (registry disabled) or
/// the tag did not import.
pub async fn resolve_pull_spec(cli: &dyn ClusterCli, config: &SmokeConfig) -> Result<String> {
    let ns = config.namespace.as_str();
    let stream = config.image.stream.as_str();
    let tag = format!("{}:{}", stream, config.image.linux_tag);

    let imported = query(
        cli,
        &[
            "get",
            "imagestreamtag",
            tag.as_str(),
            "-n",
            ns,
            "-o",
            "jsonpath={.image.dockerImageReference}",
        ],
    )
    .await?;
    if imported.is_empty() {
        return Err(SmokeError::UnexpectedOutput {
            context: format!("imagestreamtag/{}", tag),
            output: imported,
        });
    }

    let repository = query(
        cli,
        &[
            "get",
            "imagestream",
            stream,
            "-n",
            ns,
            "-o",
            "jsonpath={.status.dockerImageRepository}",
        ],
    )
    .await?;
    if repository.is_empty() {
        return Err(SmokeError::UnexpectedOutput {
            context: format!("imagestream/{} dockerImageRepository", stream),
            output: repository,
        });
    }

    Ok(format!("{}:{}", repository, config.image.linux_tag))
}

/// Import the image and return its internal pull spec.
pub async fn import_image(cli: &dyn ClusterCli, config: &SmokeConfig) -> Result<String> {
    info!(
        from = %config.linux_source_image(),
        stream = %config.image.stream,
        "importing image"
    );
    cli.run(&import_args(config), None).await?;

    let pull_spec = resolve_pull_spec(cli, config).await?;
    info!(%pull_spec, "image imported");
    Ok(pull_spec)
}
