// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes manifest types, scheduling profiles and field validation.

pub mod profiles;
pub mod types;
pub mod validation;

pub use profiles::WorkloadOs;
pub use types::{ConfigMap, Deployment, Namespace};
