// ABOUTME: Container runtime access for the local Docker daemon.
// ABOUTME: Sealed capability traits plus the bollard-backed implementation.

mod bollard;
pub(crate) mod traits;

pub use bollard::{BollardRuntime, ConnectError};
pub use traits::{ContainerError, ContainerOps, ImageError, ImageOps, PullEventStream};
pub use traits::{
    ContainerDetails, ContainerSpec, ContainerSummary, ImageRecord, LayerProgress, PortBinding,
    PullEvent,
};
