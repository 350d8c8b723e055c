// ABOUTME: Composable capability traits for the container runtime.
// ABOUTME: Defines ImageOps and ContainerOps plus their shared data types.

mod container;
mod image;
pub(crate) mod sealed;
mod shared_types;

pub use container::{ContainerError, ContainerOps};
pub use image::{ImageError, ImageOps, PullEventStream};
pub use shared_types::*;
