// ABOUTME: Errors from the cluster API client.
// ABOUTME: Conflict and missing-object responses get their own variants.

#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("invalid {kind} body: {message}")]
    InvalidBody { kind: &'static str, message: String },

    #[error("cluster API error: {0}")]
    Api(String),

    #[error("cluster connection failed: {0}")]
    Connection(String),
}
