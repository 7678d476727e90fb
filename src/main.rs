// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! hybrid-smoke entry point.
//!
//! Loads configuration, sets up logging and runs the requested plan against
//! the cluster through the `oc` CLI.

mod cli_parser;

use std::process::ExitCode;

use hybrid_smoke::error::exit;
use hybrid_smoke::logging::{self, LogFormat};
use hybrid_smoke::report::print_report_human;
use hybrid_smoke::{command_plan, manifests, OcCli, SmokeConfig, SmokeTest};
use uuid::Uuid;

use cli_parser::CliOptions;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("run");

    // `hybrid-smoke --json` runs the full plan.
    let leading_option =
        command.starts_with('-') && !matches!(command, "--help" | "-h" | "--version" | "-V");
    let (command, rest) = if leading_option {
        ("run", &args[1..])
    } else {
        (command, args.get(2..).unwrap_or(&[]))
    };

    match command {
        "help" | "--help" | "-h" => {
            if let Some(sub) = rest.first() {
                cli_parser::print_command_help(sub);
            } else {
                cli_parser::print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("hybrid-smoke {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        "run" | "nodes" | "namespace" | "image" | "cleanup" => run_plan(command, rest).await,
        "manifests" => run_manifests_cmd(rest),
        "config" => run_config_cmd(rest),
        _ => {
            eprintln!("Unknown command: {}", command);
            cli_parser::print_usage();
            ExitCode::from(exit::CONFIG)
        }
    }
}

fn parse_or_exit(args: &[String]) -> Result<CliOptions, ExitCode> {
    cli_parser::parse_options(args).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(exit::CONFIG)
    })
}

/// Load, override and validate configuration.
fn load_config(opts: &CliOptions) -> Result<SmokeConfig, ExitCode> {
    let mut config = match SmokeConfig::load(opts.config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(ExitCode::from(e.exit_code()));
        }
    };
    if let Some(ref ns) = opts.namespace {
        config.namespace = ns.clone();
    }
    if opts.cleanup {
        config.cleanup = true;
    }
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return Err(ExitCode::from(exit::CONFIG));
    }
    Ok(config)
}

async fn run_plan(command: &str, args: &[String]) -> ExitCode {
    let opts = match parse_or_exit(args) {
        Ok(o) => o,
        Err(code) => return code,
    };
    if let Some(extra) = opts.positional.first() {
        eprintln!("Unexpected argument for '{}': {}", command, extra);
        return ExitCode::from(exit::CONFIG);
    }

    logging::init(LogFormat::from_env());

    let config = match load_config(&opts) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let cli = OcCli::from_config(&config);
    let plan = command_plan(command, &config);
    let report = SmokeTest::new(&cli, &config).run(&plan).await;

    if opts.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report_human(&report);
    }

    ExitCode::from(report.exit_code())
}

fn run_manifests_cmd(args: &[String]) -> ExitCode {
    let opts = match parse_or_exit(args) {
        Ok(o) => o,
        Err(code) => return code,
    };
    let config = match load_config(&opts) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let run_id = Uuid::new_v4().to_string();
    match manifests::render_all(&config, &run_id) {
        Ok(rendered) => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render manifests: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run_config_cmd(args: &[String]) -> ExitCode {
    let opts = match parse_or_exit(args) {
        Ok(o) => o,
        Err(code) => return code,
    };
    let sub = opts.positional.first().map(|s| s.as_str()).unwrap_or("show");

    match sub {
        "show" => match load_config(&opts) {
            Ok(config) => print_toml(&config),
            Err(code) => code,
        },
        "defaults" => print_toml(&SmokeConfig::default()),
        "validate" => match load_config(&opts) {
            Ok(_) => {
                println!("Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(code) => code,
        },
        _ => {
            eprintln!("Unknown config subcommand: {}", sub);
            cli_parser::print_command_help("config");
            ExitCode::from(exit::CONFIG)
        }
    }
}

fn print_toml(config: &SmokeConfig) -> ExitCode {
    match config.to_toml() {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render configuration: {}", e);
            ExitCode::FAILURE
        }
    }
}
