// ABOUTME: Validated domain values shared across the pipeline stages.
// ABOUTME: Image references, build output tags, workload names, and platforms.

mod image_ref;
mod image_tag;
mod platform;
mod workload_name;

pub use image_ref::{ImageRef, ParseImageRefError};
pub use image_tag::{ImageTag, ImageTagError};
pub use platform::{Platform, PlatformError};
pub use workload_name::{WorkloadName, WorkloadNameError};
