// ABOUTME: Runtime type definitions for Docker and Podman.
// ABOUTME: Includes RuntimeType, the detected socket, and the settings override.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The container runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "docker"),
            RuntimeType::Podman => write!(f, "podman"),
        }
    }
}

/// A runtime socket found on this machine.
#[derive(Debug, Clone)]
pub struct DetectedRuntime {
    pub runtime_type: RuntimeType,
    pub socket_path: String,
}

/// `runtime:` section of the settings file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Explicit runtime type (overrides auto-detection).
    #[serde(default)]
    pub runtime: Option<RuntimeType>,
    /// Explicit socket path (overrides default).
    #[serde(default)]
    pub socket: Option<String>,
    /// Client-side timeout for engine API calls.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            runtime: None,
            socket: None,
            timeout: default_timeout(),
        }
    }
}
