// ABOUTME: Extracts the declared base image from a Dockerfile.
// ABOUTME: First FROM line wins; multi-stage builds are not followed.

use regex::Regex;
use std::sync::LazyLock;

use super::ArchError;
use crate::types::ImageRef;

pub const RECIPE_FILENAME: &str = "Dockerfile";

static FROM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*FROM[ \t]+([^\r\n]+)").expect("FROM pattern is valid")
});

/// Find the first `FROM` line and parse its image reference.
///
/// Flags like `--platform=...` are skipped and `AS <stage>` is ignored.
/// Returns the trimmed line alongside the reference.
pub fn find_base_image(recipe: &str) -> Result<(String, ImageRef), ArchError> {
    let captures = FROM_LINE
        .captures(recipe)
        .ok_or(ArchError::BaseImageUndeclared)?;
    let line = captures
        .get(0)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let args = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    let image = args
        .split_whitespace()
        .find(|arg| !arg.starts_with("--"))
        .ok_or(ArchError::BaseImageUndeclared)?;

    let reference = ImageRef::parse(image).map_err(|source| ArchError::InvalidBaseImage {
        line: line.clone(),
        source,
    })?;

    Ok((line, reference))
}
