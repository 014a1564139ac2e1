// ABOUTME: Liveness check for the build engine.
// ABOUTME: Lets callers fail before a pipeline starts when the socket is dead.

use async_trait::async_trait;

#[async_trait]
pub trait RuntimeInfo: Send + Sync {
    /// Round-trip to the engine API.
    async fn ping(&self) -> Result<(), RuntimeInfoError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeInfoError {
    #[error("cannot open engine socket: {0}")]
    ConnectionFailed(String),

    #[error("engine did not answer: {0}")]
    Unresponsive(String),
}
