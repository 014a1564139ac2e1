// ABOUTME: Kubernetes workload name validation.
// ABOUTME: Names follow RFC 1123 label rules so they are usable as object names.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkloadNameError {
    #[error("workload name cannot be empty")]
    Empty,

    #[error("workload name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("workload name must start with a lowercase letter or digit")]
    BadStart,

    #[error("workload name must end with a lowercase letter or digit")]
    BadEnd,

    #[error("invalid character in workload name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WorkloadName(String);

impl WorkloadName {
    pub fn new(value: &str) -> Result<Self, WorkloadNameError> {
        if value.is_empty() {
            return Err(WorkloadNameError::Empty);
        }

        if value.len() > 63 {
            return Err(WorkloadNameError::TooLong);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
        {
            return Err(WorkloadNameError::InvalidChar(c));
        }

        if value.starts_with('-') {
            return Err(WorkloadNameError::BadStart);
        }

        if value.ends_with('-') {
            return Err(WorkloadNameError::BadEnd);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkloadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
