// ABOUTME: Why the build engine could not be reached before a run.
// ABOUTME: Folds socket discovery, client setup and ping into one snafu error.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::RuntimeInfoError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("build engine detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("build engine connection failed: {source}"))]
    Connection { source: RuntimeInfoError },
}

/// Which step of reaching the engine failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// No Podman or Docker socket on this machine.
    NoRuntimeFound,
    /// `runtime.socket` names a path that does not exist.
    SocketMissing,
    /// The client could not be set up for the socket.
    ConnectionFailed,
    /// The socket exists but the engine did not answer a ping.
    Unresponsive,
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection { source } => match source {
                DetectionError::NoRuntimeFound => RuntimeErrorKind::NoRuntimeFound,
                DetectionError::SocketMissing(_) => RuntimeErrorKind::SocketMissing,
            },
            RuntimeError::Connection { source } => match source {
                RuntimeInfoError::ConnectionFailed(_) => RuntimeErrorKind::ConnectionFailed,
                RuntimeInfoError::Unresponsive(_) => RuntimeErrorKind::Unresponsive,
            },
        }
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}

impl From<RuntimeInfoError> for RuntimeError {
    fn from(source: RuntimeInfoError) -> Self {
        RuntimeError::Connection { source }
    }
}
