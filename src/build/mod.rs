// ABOUTME: Builds the tagged image from a working tree and optionally publishes it.
// ABOUTME: Build and push failures stay distinct so callers know what exists.

use std::path::Path;

use crate::runtime::{ImageError, ImageOps};
use crate::types::ImageTag;

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Publish after a successful build.
    pub push: bool,
    /// Registry endpoint to push through; `None` pushes the tag as it is.
    pub registry: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No image was produced.
    #[error("failed to build {tag}: {source}")]
    Build {
        tag: ImageTag,
        #[source]
        source: ImageError,
    },

    /// The image exists locally but the registry does not have it.
    #[error("built {tag} but failed to push {target}: {source}")]
    Push {
        tag: ImageTag,
        target: ImageTag,
        #[source]
        source: ImageError,
    },
}

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltImage {
    /// The tag from the deploy descriptor.
    pub tag: ImageTag,
    /// The reference that was pushed, if any.
    pub pushed: Option<ImageTag>,
}

pub struct ImageBuilder<'a, E: ?Sized> {
    engine: &'a E,
}

impl<'a, E> ImageBuilder<'a, E>
where
    E: ImageOps + ?Sized,
{
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Build `context` as exactly `tag`, then push when requested.
    pub async fn build(
        &self,
        context: &Path,
        tag: &ImageTag,
        options: &BuildOptions,
    ) -> Result<BuiltImage, BuildError> {
        tracing::info!("building {} from {}", tag, context.display());
        self.engine
            .build_image(context, tag)
            .await
            .map_err(|source| BuildError::Build {
                tag: tag.clone(),
                source,
            })?;

        if !options.push {
            tracing::info!("built {} (push disabled)", tag);
            return Ok(BuiltImage {
                tag: tag.clone(),
                pushed: None,
            });
        }

        let target = match &options.registry {
            Some(registry) => tag.in_registry(registry),
            None => tag.clone(),
        };

        let push_error = |source| BuildError::Push {
            tag: tag.clone(),
            target: target.clone(),
            source,
        };

        if target != *tag {
            self.engine
                .tag_image(tag, &target)
                .await
                .map_err(push_error)?;
        }

        tracing::debug!("pushing image to {}", target);
        self.engine.push_image(&target).await.map_err(push_error)?;
        tracing::info!("pushed {}", target);

        Ok(BuiltImage {
            tag: tag.clone(),
            pushed: Some(target),
        })
    }
}
