// ABOUTME: Composable capability traits for the build engine.
// ABOUTME: Defines ImageOps, RegistryOps, RuntimeInfo, and the BuildEngine bundle.

mod image;
mod registry;
mod runtime_info;

pub use image::{ImageError, ImageOps};
pub use registry::{RegistryError, RegistryOps};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};

/// Everything the pipeline needs from a build engine.
///
/// Automatically implemented for any type that implements both capability traits.
pub trait BuildEngine: ImageOps + RegistryOps {}

impl<T: ImageOps + RegistryOps> BuildEngine for T {}
