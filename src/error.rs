// ABOUTME: Application-wide error types for kaas-build.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::cluster::ClusterError;
use crate::pipeline::{PipelineError, RequestError};
use crate::runtime::RuntimeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("settings file not found: {0}")]
    SettingsNotFound(PathBuf),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("{key}: environment variable {var} is unset and has no default")]
    MissingEnvVar { key: &'static str, var: String },

    #[error("Bad request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("cluster connection failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
