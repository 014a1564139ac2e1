// ABOUTME: Build-engine socket detection on the local machine.
// ABOUTME: Checks for Podman sockets first, then Docker, unless settings pin one.

use super::types::{DetectedRuntime, RuntimeConfig, RuntimeType};
use std::path::Path;

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("configured socket does not exist: {0}")]
    SocketMissing(String),
}

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Pick the runtime socket, honouring explicit settings first.
pub fn resolve_runtime(config: &RuntimeConfig) -> Result<DetectedRuntime, DetectionError> {
    match (config.runtime, &config.socket) {
        (runtime, Some(socket)) => {
            if !Path::new(socket).exists() {
                return Err(DetectionError::SocketMissing(socket.clone()));
            }
            Ok(DetectedRuntime {
                runtime_type: runtime.unwrap_or(RuntimeType::Docker),
                socket_path: socket.clone(),
            })
        }
        (Some(runtime_type), None) => Ok(DetectedRuntime {
            runtime_type,
            socket_path: default_socket_path(runtime_type),
        }),
        (None, None) => detect_local(),
    }
}

/// Detect container runtime on the local system.
///
/// Detection order:
/// 1. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 2. Rootful Podman socket (`/run/podman/podman.sock`)
/// 3. Docker socket (`/var/run/docker.sock`)
pub fn detect_local() -> Result<DetectedRuntime, DetectionError> {
    if let Some(uid) = get_uid() {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if Path::new(&rootless_socket).exists() {
            return Ok(DetectedRuntime {
                runtime_type: RuntimeType::Podman,
                socket_path: rootless_socket,
            });
        }
    }

    if Path::new(ROOTFUL_PODMAN).exists() {
        return Ok(DetectedRuntime {
            runtime_type: RuntimeType::Podman,
            socket_path: ROOTFUL_PODMAN.to_string(),
        });
    }

    if Path::new(DOCKER_SOCKET).exists() {
        return Ok(DetectedRuntime {
            runtime_type: RuntimeType::Docker,
            socket_path: DOCKER_SOCKET.to_string(),
        });
    }

    Err(DetectionError::NoRuntimeFound)
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn default_socket_path(runtime: RuntimeType) -> String {
    match runtime {
        RuntimeType::Docker => DOCKER_SOCKET.to_string(),
        RuntimeType::Podman => ROOTFUL_PODMAN.to_string(),
    }
}
