// ABOUTME: Pipeline orchestration using the type state pattern.
// ABOUTME: Sequences checkout, config, arch check, build, and cluster stages.

mod error;
mod lock;
mod orchestrator;
mod request;
mod result;
mod run;
mod state;
mod transitions;

pub use error::{ErrorKind, PipelineError, Stage, StageError};
pub use lock::{LockInfo, WorkloadGuard, WorkloadLocks};
pub use orchestrator::{Pipeline, PipelineSettings, remove};
pub use request::{
    CreateRequest, DEFAULT_BRANCH, RemoveRequest, RequestError, RestartRequest, config_arg,
};
pub use result::{Action, Outcome, PipelineResult};
pub use run::Run;
pub use state::{Built, Cloned, Configured, Validated};
