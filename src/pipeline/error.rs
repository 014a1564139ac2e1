// ABOUTME: Error types for pipeline runs.
// ABOUTME: Every stage failure is tagged with its stage and classified by kind.

use std::fmt;

use crate::arch::ArchError;
use crate::build::BuildError;
use crate::cluster::DeployError;
use crate::descriptor::ConfigError;
use crate::source::SourceError;

/// Pipeline stage that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Clone,
    Config,
    ArchCheck,
    Build,
    Push,
    Deploy,
    Restart,
    Delete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Clone => "clone",
            Stage::Config => "config",
            Stage::ArchCheck => "arch-check",
            Stage::Build => "build",
            Stage::Push => "push",
            Stage::Deploy => "deploy",
            Stage::Restart => "restart",
            Stage::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Categorizes pipeline errors for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    SourceUnreachable,
    RefNotFound,
    ConfigNotFound,
    ConfigMalformed,
    ArchitectureUnsupported,
    ArchitectureCheckFailed,
    BuildFailed,
    PushFailed,
    AlreadyExists,
    NotFound,
    DeploymentFailed,
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Arch(#[from] ArchError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

/// A failed pipeline run.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    stage: Stage,
    #[source]
    source: StageError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    pub(crate) fn build(err: BuildError) -> Self {
        let stage = match err {
            BuildError::Build { .. } => Stage::Build,
            BuildError::Push { .. } => Stage::Push,
        };
        Self::new(stage, err)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.source {
            StageError::Source(SourceError::RefNotFound { .. }) => ErrorKind::RefNotFound,
            StageError::Source(_) => ErrorKind::SourceUnreachable,
            StageError::Config(ConfigError::NotFound(_)) => ErrorKind::ConfigNotFound,
            StageError::Config(_) => ErrorKind::ConfigMalformed,
            StageError::Arch(ArchError::Unsupported { .. }) => ErrorKind::ArchitectureUnsupported,
            StageError::Arch(_) => ErrorKind::ArchitectureCheckFailed,
            StageError::Build(BuildError::Build { .. }) => ErrorKind::BuildFailed,
            StageError::Build(BuildError::Push { .. }) => ErrorKind::PushFailed,
            StageError::Deploy(DeployError::AlreadyExists(_)) => ErrorKind::AlreadyExists,
            StageError::Deploy(DeployError::NotFound(_)) => ErrorKind::NotFound,
            StageError::Deploy(DeployError::Failed { .. }) => ErrorKind::DeploymentFailed,
        }
    }
}
