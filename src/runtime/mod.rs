// ABOUTME: Build-engine client: socket discovery, connection, and image capabilities.
// ABOUTME: Docker and Podman are both driven through the Docker-compatible API.

mod bollard;
mod detection;
mod error;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{DetectionError, detect_local, resolve_runtime};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::*;
pub use types::{DetectedRuntime, RuntimeConfig, RuntimeType};
