// ABOUTME: Registry metadata trait for the build engine.
// ABOUTME: Looks up which platforms a published image supports.

use crate::types::{ImageRef, Platform};
use async_trait::async_trait;

#[async_trait]
pub trait RegistryOps: Send + Sync {
    /// Platforms listed in the image's published manifest.
    async fn image_platforms(&self, reference: &ImageRef) -> Result<Vec<Platform>, RegistryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("image not found in registry: {0}")]
    NotFound(String),

    #[error("registry lookup failed for {image}: {message}")]
    Lookup { image: String, message: String },
}
