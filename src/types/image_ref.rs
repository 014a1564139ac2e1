// ABOUTME: Base image reference parsing for build recipes.
// ABOUTME: Handles forms like alpine, alpine:3.19, ghcr.io/org/img:tag@sha256:...

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),
}

/// A parsed image reference as it appears in a `FROM` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    registry: Option<String>,
    name: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if let Some(c) = input
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !"/:.-_@".contains(*c))
        {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        let (reference, digest) = match input.split_once('@') {
            Some((before, after)) if !after.is_empty() => (before, Some(after.to_string())),
            Some(_) => return Err(ParseImageRefError::InvalidFormat(input.to_string())),
            None => (input, None),
        };

        // A colon followed by a path segment belongs to a registry port, not a tag.
        let (repository, tag) = match reference.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => {
                if after.is_empty() {
                    return Err(ParseImageRefError::InvalidFormat(input.to_string()));
                }
                (before, Some(after.to_string()))
            }
            _ => (reference, None),
        };

        let (registry, name) = split_registry(repository)?;

        let tag = match (&tag, &digest) {
            (None, None) => Some("latest".to_string()),
            _ => tag,
        };

        Ok(Self {
            registry,
            name,
            tag,
            digest,
        })
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The empty base image. It has no manifest and runs anywhere.
    pub fn is_scratch(&self) -> bool {
        self.registry.is_none() && self.name == "scratch"
    }
}

fn split_registry(input: &str) -> Result<(Option<String>, String), ParseImageRefError> {
    if input.is_empty() || input.starts_with('/') || input.ends_with('/') {
        return Err(ParseImageRefError::InvalidFormat(input.to_string()));
    }

    match input.split_once('/') {
        Some((first, rest))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            Ok((Some(first.to_string()), rest.to_string()))
        }
        _ => Ok((None, input.to_string())),
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref registry) = self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(ref digest) = self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}
