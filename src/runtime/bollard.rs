// ABOUTME: Bollard-based build engine implementation.
// ABOUTME: Supports both Docker and Podman via Docker-compatible API.

use crate::runtime::traits::{
    ImageError, ImageOps, RegistryError, RegistryOps, RuntimeInfo, RuntimeInfoError,
};
use crate::runtime::types::{DetectedRuntime, RuntimeType};
use crate::types::{ImageRef, ImageTag, Platform};
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{BuildImageOptions, PushImageOptions, TagImageOptions};
use bytes::Bytes;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directories never sent to the engine as part of a build context.
const CONTEXT_EXCLUDES: &[&str] = &[".git"];

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_tag_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        _ => ImageError::Runtime(format!("failed to tag {}: {}", image_name, e)),
    }
}

fn map_push_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    ImageError::PushFailed(format!("{}: {}", image_name, e))
}

fn map_registry_error(e: bollard::errors::Error, image_name: &str) -> RegistryError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            RegistryError::NotFound(image_name.to_string())
        }
        _ => RegistryError::Lookup {
            image: image_name.to_string(),
            message: e.to_string(),
        },
    }
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Build engine implementation using bollard.
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
}

impl BollardRuntime {
    pub fn new(client: Docker, runtime_type: RuntimeType) -> Self {
        Self {
            client,
            runtime_type,
        }
    }

    /// Connect to the engine socket found by `resolve_runtime()`.
    ///
    /// The connection is lazy: nothing is sent until the first call.
    pub fn connect(info: &DetectedRuntime, timeout: Duration) -> Result<Self, RuntimeInfoError> {
        let client = Docker::connect_with_unix(
            &info.socket_path,
            timeout.as_secs(),
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new(client, info.runtime_type))
    }

    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }
}

/// Pack a directory into an uncompressed tar archive for the build endpoint.
async fn archive_context(context: &Path) -> Result<Bytes, ImageError> {
    let context: PathBuf = context.to_path_buf();
    let archive = tokio::task::spawn_blocking(move || -> std::io::Result<Vec<u8>> {
        let mut builder = tar::Builder::new(Vec::new());
        builder.follow_symlinks(false);
        for entry in std::fs::read_dir(&context)? {
            let entry = entry?;
            let name = entry.file_name();
            if CONTEXT_EXCLUDES.iter().any(|ex| name == *ex) {
                continue;
            }
            if entry.file_type()?.is_dir() {
                builder.append_dir_all(&name, entry.path())?;
            } else {
                builder.append_path_with_name(entry.path(), &name)?;
            }
        }
        builder.into_inner()
    })
    .await
    .map_err(|e| ImageError::Context(e.to_string()))?
    .map_err(|e| ImageError::Context(e.to_string()))?;

    Ok(Bytes::from(archive))
}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client
            .ping()
            .await
            .map_err(|e| RuntimeInfoError::Unresponsive(e.to_string()))?;
        tracing::debug!("{} engine answered ping", self.runtime_type);
        Ok(())
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn build_image(&self, context: &Path, tag: &ImageTag) -> Result<(), ImageError> {
        let body = archive_context(context).await?;
        tracing::debug!(
            "sending {} byte build context from {}",
            body.len(),
            context.display()
        );

        let options = BuildImageOptions {
            dockerfile: "Dockerfile".to_string(),
            t: Some(tag.to_string()),
            rm: true,
            ..Default::default()
        };

        // The build endpoint streams progress; an error can arrive in any item.
        let mut stream = self
            .client
            .build_image(options, None, Some(bollard::body_full(body)));
        while let Some(item) = stream.next().await {
            let info = item.map_err(|e| ImageError::BuildFailed(format!("{}: {}", tag, e)))?;
            if let Some(detail) = info.error_detail {
                let message = detail
                    .message
                    .unwrap_or_else(|| "unknown build error".to_string());
                return Err(ImageError::BuildFailed(format!("{}: {}", tag, message)));
            }
            if let Some(line) = info.stream {
                let line = line.trim_end();
                if !line.is_empty() {
                    tracing::debug!("{}", line);
                }
            }
        }

        Ok(())
    }

    async fn tag_image(&self, source: &ImageTag, target: &ImageTag) -> Result<(), ImageError> {
        let (repo, tag) = target.repository_and_tag();
        let options = TagImageOptions {
            repo: Some(repo.to_string()),
            tag: Some(tag.to_string()),
            ..Default::default()
        };

        self.client
            .tag_image(source.as_str(), Some(options))
            .await
            .map_err(|e| map_tag_error(e, source.as_str()))?;

        Ok(())
    }

    async fn push_image(&self, reference: &ImageTag) -> Result<(), ImageError> {
        let (repo, tag) = reference.repository_and_tag();
        let options = PushImageOptions {
            tag: Some(tag.to_string()),
            ..Default::default()
        };

        let mut stream = self.client.push_image(repo, Some(options), None);
        while let Some(item) = stream.next().await {
            let info = item.map_err(|e| map_push_error(e, reference.as_str()))?;
            if let Some(detail) = info.error_detail {
                let message = detail
                    .message
                    .unwrap_or_else(|| "unknown push error".to_string());
                return Err(ImageError::PushFailed(format!("{}: {}", reference, message)));
            }
            if let Some(status) = info.status {
                tracing::debug!("push {}: {}", reference, status);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl RegistryOps for BollardRuntime {
    async fn image_platforms(&self, reference: &ImageRef) -> Result<Vec<Platform>, RegistryError> {
        let image_name = reference.to_string();

        let inspect = self
            .client
            .inspect_registry_image(&image_name, None)
            .await
            .map_err(|e| map_registry_error(e, &image_name))?;

        Ok(inspect
            .platforms
            .into_iter()
            .filter_map(|p| match (p.os, p.architecture) {
                (Some(os), Some(arch)) => Some(Platform::new(&os, &arch)),
                _ => None,
            })
            .collect())
    }
}
