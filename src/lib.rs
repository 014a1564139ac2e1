// ABOUTME: Library root for kaas-build - exposes the pipeline and its stages.
// ABOUTME: The main binary is in main.rs.

pub mod arch;
pub mod build;
pub mod cluster;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod runtime;
pub mod server;
pub mod source;
pub mod types;
