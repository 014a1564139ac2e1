// ABOUTME: Terminal record of one pipeline run.
// ABOUTME: Built once when the run ends and logged, never mutated afterward.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::{ErrorKind, PipelineError, Stage};

/// Which pipeline ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Restart,
    Remove,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Restart => write!(f, "restart"),
            Action::Remove => write!(f, "remove"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Success {
        image: String,
    },
    Failed {
        stage: Stage,
        kind: ErrorKind,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub action: Action,
    pub outcome: Outcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineResult {
    pub fn new<T: fmt::Display>(
        action: Action,
        result: &Result<T, PipelineError>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let outcome = match result {
            Ok(image) => Outcome::Success {
                image: image.to_string(),
            },
            Err(e) => Outcome::Failed {
                stage: e.stage(),
                kind: e.kind(),
                message: e.to_string(),
            },
        };
        Self {
            action,
            outcome,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// Emit the result as a single log event.
    pub fn log(&self) {
        let elapsed_ms = (self.finished_at - self.started_at).num_milliseconds();
        match &self.outcome {
            Outcome::Success { image } => {
                tracing::info!(action = %self.action, elapsed_ms, "{} succeeded: {}", self.action, image)
            }
            Outcome::Failed {
                stage,
                kind,
                message,
            } => tracing::error!(
                action = %self.action,
                %stage,
                ?kind,
                elapsed_ms,
                "{} failed: {}",
                self.action,
                message
            ),
        }
    }
}
