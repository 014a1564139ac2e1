// ABOUTME: Refuses builds whose base image cannot run on the build host.
// ABOUTME: Scans the recipe for its FROM line and compares published platforms.

mod recipe;

pub use recipe::{RECIPE_FILENAME, find_base_image};

use std::path::{Path, PathBuf};

use crate::runtime::{RegistryError, RegistryOps};
use crate::types::{ImageRef, ParseImageRefError, Platform, PlatformError};

#[derive(Debug, thiserror::Error)]
pub enum ArchError {
    #[error("build recipe not found: {0}")]
    RecipeNotFound(PathBuf),

    #[error("failed to read build recipe {path}: {source}")]
    RecipeUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("build recipe declares no base image")]
    BaseImageUndeclared,

    #[error("invalid base image in '{line}': {source}")]
    InvalidBaseImage {
        line: String,
        #[source]
        source: ParseImageRefError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("cannot determine host platform: {0}")]
    HostPlatform(#[from] PlatformError),

    #[error("image '{image}' does not support {host} (supports {})", join(.supported))]
    Unsupported {
        image: String,
        host: Platform,
        supported: Vec<Platform>,
    },
}

fn join(platforms: &[Platform]) -> String {
    if platforms.is_empty() {
        return "no platforms".to_string();
    }
    platforms
        .iter()
        .map(Platform::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// What was learned about the base image.
#[derive(Debug, Clone)]
pub struct BasePlatformInfo {
    pub image_reference: ImageRef,
    pub declared_from_line: String,
    pub supported_platforms: Vec<Platform>,
}

/// Check that the recipe's base image publishes a variant for `host`.
///
/// Must run before any build: a mismatch means the image could never run here.
pub async fn validate<R>(
    repo_root: &Path,
    host: &Platform,
    registry: &R,
) -> Result<BasePlatformInfo, ArchError>
where
    R: RegistryOps + ?Sized,
{
    let recipe_path = repo_root.join(RECIPE_FILENAME);
    let recipe = tokio::fs::read_to_string(&recipe_path)
        .await
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => {
                ArchError::RecipeNotFound(PathBuf::from(RECIPE_FILENAME))
            }
            _ => ArchError::RecipeUnreadable {
                path: PathBuf::from(RECIPE_FILENAME),
                source,
            },
        })?;

    let (declared_from_line, image_reference) = find_base_image(&recipe)?;

    if image_reference.is_scratch() {
        tracing::info!("base image is scratch, skipping architecture check");
        return Ok(BasePlatformInfo {
            image_reference,
            declared_from_line,
            supported_platforms: Vec::new(),
        });
    }

    tracing::info!(
        "checking base image {} supports {}",
        image_reference,
        host
    );
    let supported_platforms = registry.image_platforms(&image_reference).await?;

    if !supported_platforms.contains(host) {
        return Err(ArchError::Unsupported {
            image: image_reference.to_string(),
            host: host.clone(),
            supported: supported_platforms,
        });
    }

    tracing::info!("base image {} good, continuing build", image_reference);
    Ok(BasePlatformInfo {
        image_reference,
        declared_from_line,
        supported_platforms,
    })
}
