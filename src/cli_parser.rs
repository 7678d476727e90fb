// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing and help text for hybrid-smoke.

use std::path::PathBuf;

/// Options shared by all commands.
#[derive(Debug, Default, PartialEq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub json: bool,
    pub cleanup: bool,
    pub namespace: Option<String>,
    /// Positional arguments (sub-commands such as `config show`).
    pub positional: Vec<String>,
}

/// Parse options following the command name.
pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let value = args.get(i + 1).ok_or("Missing value for --config")?;
                opts.config_path = Some(PathBuf::from(value));
                i += 2;
            }
            "--namespace" | "-n" => {
                let value = args.get(i + 1).ok_or("Missing value for --namespace")?;
                opts.namespace = Some(value.clone());
                i += 2;
            }
            "--json" => {
                opts.json = true;
                i += 1;
            }
            "--cleanup" => {
                opts.cleanup = true;
                i += 1;
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown argument: {}", other));
            }
            other => {
                opts.positional.push(other.to_string());
                i += 1;
            }
        }
    }

    Ok(opts)
}

/// Print general usage information.
pub fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "hybrid-smoke - Disconnected OpenShift Windows/Linux smoke test v{}

USAGE:
    hybrid-smoke [COMMAND] [OPTIONS]

COMMANDS:
    run          Full smoke test (default when no command given)
    nodes        Check Windows and Linux node readiness
    namespace    Create or select the smoke test namespace
    image        Import the mirrored image into the image stream
    manifests    Print rendered manifests without touching the cluster
    cleanup      Delete the smoke test namespace
    config       Manage configuration (show, defaults, validate)
    version      Show version information
    help         Show this help message

OPTIONS:
    --config FILE      Load configuration from a TOML file
    -n, --namespace NS Override the namespace
    --json             Print the run report as JSON
    --cleanup          Delete the namespace after a successful run
    -h, --help         Show help for command
    -V, --version      Show version information

EXAMPLES:
    hybrid-smoke                                # Full run with defaults
    hybrid-smoke run --config smoke.toml --json
    hybrid-smoke nodes                          # Node readiness only
    hybrid-smoke manifests | oc apply --dry-run=server -f -
    hybrid-smoke config validate --config smoke.toml

ENVIRONMENT:
    HYBRID_SMOKE_CONFIG           Config file path
    HYBRID_SMOKE_NAMESPACE        Namespace override
    HYBRID_SMOKE_MIRROR_REGISTRY  Disconnected registry host
    HYBRID_SMOKE_OC_BIN           Cluster CLI binary (default: oc)
    HYBRID_SMOKE_LOG_FORMAT       Log format (text, json)
    KUBECONFIG                    Kubeconfig passed to the CLI
    RUST_LOG                      Log level (debug, info, warn, error)

EXIT CODES:
    0  Success
    1  Step failed
    2  Configuration error
    3  Cluster CLI not available
    4  Readiness timeout
",
        version
    );
}

/// Print detailed help for a specific command.
pub fn print_command_help(command: &str) {
    match command {
        "run" => print_run_help(),
        "nodes" => print_nodes_help(),
        "image" => print_image_help(),
        "config" => print_config_help(),
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'hybrid-smoke help' for general usage.",
                command
            );
        }
    }
}

fn print_run_help() {
    eprintln!(
        "hybrid-smoke run - Full smoke test

USAGE:
    hybrid-smoke run [OPTIONS]

STEPS:
    nodes             Wait for Windows nodes, check Linux workers
    namespace         Create or select the namespace, apply labels
    configmap         Apply the shared ConfigMap
    import-image      Import the Linux image into the image stream
    windows-workload  Deploy and poll the Windows web server
    linux-workload    Deploy and poll the Linux web server
    cleanup           Delete the namespace (with --cleanup)

Execution stops at the first failing step.
"
    );
}

fn print_nodes_help() {
    eprintln!(
        "hybrid-smoke nodes - Node readiness

USAGE:
    hybrid-smoke nodes [OPTIONS]

DESCRIPTION:
    Waits for the configured Windows machineset (if any) and Windows nodes
    to become Ready, then checks the Linux worker count once.

EXIT CODES:
    0  Nodes ready
    1  Not enough Linux workers
    4  Windows nodes did not become Ready in time
"
    );
}

fn print_image_help() {
    eprintln!(
        "hybrid-smoke image - Import the mirrored image

USAGE:
    hybrid-smoke image [OPTIONS]

DESCRIPTION:
    Ensures the namespace, then runs import-image from the mirror registry
    with a local reference policy and prints the internal pull spec.
"
    );
}

fn print_config_help() {
    eprintln!(
        "hybrid-smoke config - Manage configuration

USAGE:
    hybrid-smoke config <SUBCOMMAND> [--config FILE]

SUBCOMMANDS:
    show           Show effective configuration
    defaults       Show default configuration
    validate       Validate configuration
"
    );
}
