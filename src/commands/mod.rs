// ABOUTME: Command module aggregator for the kaas-build CLI.
// ABOUTME: Re-exports the build, restart, delete, and serve handlers.

pub mod build;
mod connect;
mod delete;
pub mod restart;
mod serve;

pub use build::build;
pub use delete::delete;
pub use restart::restart;
pub use serve::serve;
