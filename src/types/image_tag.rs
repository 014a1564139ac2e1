// ABOUTME: The label attached to a build output, read from the deploy descriptor.
// ABOUTME: Only emptiness is checked here; the build engine owns naming rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageTagError {
    #[error("image tag cannot be empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageTag(String);

impl ImageTag {
    pub fn new(value: &str) -> Result<Self, ImageTagError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ImageTagError::Empty);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into repository and tag, defaulting the tag to `latest`.
    ///
    /// `localhost:5000/svc` has no tag: the colon belongs to the registry port.
    pub fn repository_and_tag(&self) -> (&str, &str) {
        let without_digest = self.0.split('@').next().unwrap_or(&self.0);
        match without_digest.rsplit_once(':') {
            Some((repo, tag)) if !tag.contains('/') => (repo, tag),
            _ => (without_digest, "latest"),
        }
    }

    /// The same image addressed through `registry`.
    pub fn in_registry(&self, registry: &str) -> ImageTag {
        let registry = registry.trim_end_matches('/');
        if self.0.starts_with(&format!("{registry}/")) {
            return self.clone();
        }
        ImageTag(format!("{registry}/{}", self.0))
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
