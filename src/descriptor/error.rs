// ABOUTME: Errors raised while locating or parsing descriptors.
// ABOUTME: NotFound and Malformed map directly onto the pipeline taxonomy.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found in repo or specified in request: {0}")]
    NotFound(PathBuf),

    #[error("malformed config: {0}")]
    Malformed(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ConfigError::Malformed(message.into())
    }
}
