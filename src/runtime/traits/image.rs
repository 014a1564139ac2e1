// ABOUTME: Image operations trait for the build engine.
// ABOUTME: Build from a context directory, tag, and publish images.

use crate::types::ImageTag;
use async_trait::async_trait;
use std::path::Path;

/// Image operations: build, tag, push.
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// Build the recipe at `context/Dockerfile`, labelling the result `tag`.
    async fn build_image(&self, context: &Path, tag: &ImageTag) -> Result<(), ImageError>;

    /// Give an existing local image an additional name.
    async fn tag_image(&self, source: &ImageTag, target: &ImageTag) -> Result<(), ImageError>;

    /// Publish a local image to the registry its name points at.
    async fn push_image(&self, reference: &ImageTag) -> Result<(), ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("build context unreadable: {0}")]
    Context(String),

    #[error("build failed: {0}")]
    BuildFailed(String),

    #[error("image not found: {0}")]
    NotFound(String),

    #[error("push failed: {0}")]
    PushFailed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
