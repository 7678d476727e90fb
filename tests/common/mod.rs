// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scripted `ClusterCli` for end-to-end runs without a cluster.
//!
//! A rule matches when every one of its tokens appears as a whole argument.
//! Rules added later win, so a test can start from `ScriptedCli::healthy()`
//! and override single commands. Each rule replays its replies in order and
//! repeats the last one. Unmatched invocations succeed with empty output.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;

use hybrid_smoke::steps::deploy::{POD_NODE_JSONPATH, ROLLOUT_JSONPATH};
use hybrid_smoke::steps::nodes::READY_CONDITION_JSONPATH;
use hybrid_smoke::{ClusterCli, CommandOutput, Result, SmokeConfig, SmokeError};

pub const NODE_NAMES_JSONPATH: &str = "jsonpath={.items[*].metadata.name}";
pub const INTERNAL_REPO: &str = "image-registry.openshift-image-registry.svc:5000/hybrid-smoke/httpd";

#[derive(Debug, Clone)]
pub enum Reply {
    Stdout(String),
    Failed(String),
    Unavailable,
}

pub fn out(s: &str) -> Reply {
    Reply::Stdout(s.to_string())
}

#[derive(Debug, Clone)]
pub struct Call {
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

impl Call {
    pub fn has(&self, tokens: &[&str]) -> bool {
        tokens.iter().all(|t| self.args.iter().any(|a| a == t))
    }
}

struct Rule {
    tokens: Vec<String>,
    replies: VecDeque<Reply>,
}

#[derive(Default)]
pub struct ScriptedCli {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cluster where every step of the default config succeeds.
    pub fn healthy() -> Self {
        let cli = Self::new();
        cli.on(&["nodes", "kubernetes.io/os=windows", READY_CONDITION_JSONPATH], out("True\n"));
        cli.on(
            &["nodes", "kubernetes.io/os=linux,node-role.kubernetes.io/worker", READY_CONDITION_JSONPATH],
            out("True\nTrue\n"),
        );
        cli.on(&["get", "namespace", "hybrid-smoke"], out(""));
        cli.on(
            &["imagestreamtag", "httpd:latest"],
            out("mirror.registry.local:5000/ubi9/httpd-24@sha256:0123abcd"),
        );
        cli.on(&["imagestream", "httpd"], out(INTERNAL_REPO));
        cli.on(&["deployment", "win-webserver", ROLLOUT_JSONPATH], out("1/1/1/1/1"));
        cli.on(&["deployment", "linux-webserver", ROLLOUT_JSONPATH], out("1/1/1/1/1"));
        cli.on(&["nodes", "kubernetes.io/os=windows", NODE_NAMES_JSONPATH], out("winworker-1"));
        cli.on(&["nodes", "kubernetes.io/os=linux", NODE_NAMES_JSONPATH], out("worker-0 worker-1"));
        cli.on(
            &["pods", "app=win-webserver", POD_NODE_JSONPATH],
            out("win-webserver-6d8f9-abcde winworker-1\n"),
        );
        cli.on(
            &["pods", "app=linux-webserver", POD_NODE_JSONPATH],
            out("linux-webserver-7c4b2-fghij worker-0\n"),
        );
        cli
    }

    pub fn on(&self, tokens: &[&str], reply: Reply) -> &Self {
        self.on_seq(tokens, vec![reply])
    }

    pub fn on_seq(&self, tokens: &[&str], replies: Vec<Reply>) -> &Self {
        self.rules.lock().unwrap().push(Rule {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            replies: replies.into(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, tokens: &[&str]) -> usize {
        self.calls().iter().filter(|c| c.has(tokens)).count()
    }

    fn next_reply(&self, args: &[String]) -> Option<Reply> {
        let mut rules = self.rules.lock().unwrap();
        let rule = rules
            .iter_mut()
            .rev()
            .find(|r| r.tokens.iter().all(|t| args.iter().any(|a| a == t)))?;
        if rule.replies.len() > 1 {
            rule.replies.pop_front()
        } else {
            rule.replies.front().cloned()
        }
    }
}

#[async_trait]
impl ClusterCli for ScriptedCli {
    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(Call {
            args: args.to_vec(),
            stdin: stdin.map(str::to_string),
        });

        match self.next_reply(args) {
            None => Ok(CommandOutput::default()),
            Some(Reply::Stdout(stdout)) => Ok(CommandOutput {
                stdout,
                stderr: String::new(),
            }),
            Some(Reply::Failed(stderr)) => Err(SmokeError::CommandFailed {
                program: "oc".to_string(),
                args: args.join(" "),
                code: Some(1),
                stderr,
            }),
            Some(Reply::Unavailable) => Err(SmokeError::Spawn {
                program: "oc".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            }),
        }
    }
}

/// Default config with sleeps removed and short attempt budgets.
pub fn fast_config() -> SmokeConfig {
    let mut config = SmokeConfig::default();
    config.polling.interval_secs = 0;
    config.polling.max_attempts = 3;
    config.polling.node_interval_secs = 0;
    config.polling.node_max_attempts = 2;
    config
}
