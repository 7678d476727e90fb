// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Validation functions for values passed to the cluster CLI.
//!
//! Every value here ends up as an `oc` argument or inside a manifest, so
//! shell metacharacters and malformed names are rejected up front.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum allowed length for string fields.
pub const MAX_FIELD_LENGTH: usize = 256;

/// Maximum length of a DNS-1123 label (namespace, deployment, stream names).
pub const MAX_NAME_LENGTH: usize = 63;

/// Maximum length of a label value.
const MAX_LABEL_VALUE_LENGTH: usize = 63;

/// Maximum length of the name segment of a label key.
const MAX_LABEL_NAME_LENGTH: usize = 63;

/// Maximum length of the prefix segment of a label key.
const MAX_LABEL_PREFIX_LENGTH: usize = 253;

const FORBIDDEN_CHARS: [char; 14] = [
    ';', '&', '|', '`', '$', '(', ')', '{', '}', '<', '>', '\n', '\r', '\0',
];

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Image reference is invalid.
    InvalidImage(String),
    /// Resource name is not a DNS-1123 label.
    InvalidName { field: String, value: String },
    /// Label key or value is malformed.
    InvalidLabel(String),
    /// Registry host is malformed.
    InvalidRegistry(String),
    /// Numeric field is below its minimum.
    OutOfRange { field: String, min: u64 },
    /// Field exceeds maximum length.
    MaxLengthExceeded { field: String, max: usize },
    /// Field is empty but required.
    EmptyField(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidImage(img) => write!(f, "Invalid image reference: {}", img),
            Self::InvalidName { field, value } => {
                write!(f, "Field '{}' is not a valid DNS-1123 name: {}", field, value)
            }
            Self::InvalidLabel(l) => write!(f, "Invalid label: {}", l),
            Self::InvalidRegistry(r) => write!(f, "Invalid registry host: {}", r),
            Self::OutOfRange { field, min } => {
                write!(f, "Field '{}' must be at least {}", field, min)
            }
            Self::MaxLengthExceeded { field, max } => {
                write!(f, "Field '{}' exceeds maximum length of {}", field, max)
            }
            Self::EmptyField(field) => write!(f, "Field '{}' cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

fn dns_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("static regex")
    })
}

fn label_segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$").expect("static regex")
    })
}

fn registry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]([-A-Za-z0-9.]*[A-Za-z0-9])?(:[0-9]{1,5})?(/[a-z0-9][-a-z0-9._/]*)?$")
            .expect("static regex")
    })
}

/// Validate a Kubernetes object name (namespace, deployment, image stream).
pub fn validate_resource_name(name: &str, field_name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyField(field_name.to_string()));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::MaxLengthExceeded {
            field: field_name.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    if !dns_label_re().is_match(name) {
        return Err(ValidationError::InvalidName {
            field: field_name.to_string(),
            value: name.to_string(),
        });
    }

    Ok(())
}

/// Validate a container image reference.
///
/// Rejects shell metacharacters and invalid name formats.
pub fn validate_image(image: &str) -> Result<(), ValidationError> {
    if image.is_empty() {
        return Err(ValidationError::EmptyField("image".to_string()));
    }

    if image.len() > MAX_FIELD_LENGTH {
        return Err(ValidationError::MaxLengthExceeded {
            field: "image".to_string(),
            max: MAX_FIELD_LENGTH,
        });
    }

    for ch in FORBIDDEN_CHARS {
        if image.contains(ch) {
            return Err(ValidationError::InvalidImage(format!(
                "contains forbidden character: {:?}",
                ch
            )));
        }
    }

    if image.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidImage(
            "contains whitespace".to_string(),
        ));
    }

    let parts: Vec<&str> = image.rsplitn(2, ':').collect();
    let name_part = parts.last().unwrap_or(&image);

    if name_part.starts_with('-') || name_part.starts_with('.') || name_part.starts_with('/') {
        return Err(ValidationError::InvalidImage(
            "name cannot start with dash, dot or slash".to_string(),
        ));
    }

    Ok(())
}

/// Validate a mirror registry host, optionally with port and path prefix.
///
/// Accepts `mirror.example.com:5000` and `mirror.example.com:5000/ocp4`.
pub fn validate_registry(registry: &str) -> Result<(), ValidationError> {
    if registry.is_empty() {
        return Err(ValidationError::EmptyField("mirror_registry".to_string()));
    }

    if registry.len() > MAX_FIELD_LENGTH {
        return Err(ValidationError::MaxLengthExceeded {
            field: "mirror_registry".to_string(),
            max: MAX_FIELD_LENGTH,
        });
    }

    if !registry_re().is_match(registry) {
        return Err(ValidationError::InvalidRegistry(registry.to_string()));
    }

    Ok(())
}

/// Validate a label key (`[prefix/]name`).
pub fn validate_label_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyField("label key".to_string()));
    }

    let (prefix, name) = match key.split_once('/') {
        Some((p, n)) => (Some(p), n),
        None => (None, key),
    };

    if let Some(prefix) = prefix {
        if prefix.is_empty() || prefix.len() > MAX_LABEL_PREFIX_LENGTH {
            return Err(ValidationError::InvalidLabel(format!("bad prefix in {}", key)));
        }
        if !prefix.split('.').all(|seg| dns_label_re().is_match(seg)) {
            return Err(ValidationError::InvalidLabel(format!("bad prefix in {}", key)));
        }
    }

    if name.len() > MAX_LABEL_NAME_LENGTH || !label_segment_re().is_match(name) {
        return Err(ValidationError::InvalidLabel(format!("bad name in {}", key)));
    }

    Ok(())
}

/// Validate a label value. Empty values are allowed.
pub fn validate_label_value(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }

    if value.len() > MAX_LABEL_VALUE_LENGTH || !label_segment_re().is_match(value) {
        return Err(ValidationError::InvalidLabel(format!("bad value {:?}", value)));
    }

    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
