// ABOUTME: Reconciliation error types with SNAFU pattern.
// ABOUTME: Unifies image and container failures for programmatic handling.

use snafu::Snafu;

use crate::runtime::{ContainerError, ImageError};

/// Unified error for `run`/`stop` operations.
///
/// Adapter failures propagate through here unmodified; the reconciler
/// never retries and never remaps a failure into a different category.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ReconcileError {
    #[snafu(display("image operation failed: {source}"))]
    Image { source: ImageError },

    #[snafu(display("container operation failed: {source}"))]
    Container { source: ContainerError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileErrorKind {
    /// The daemon cannot be reached.
    RuntimeUnavailable,
    /// The daemon rejected or aborted an image pull.
    PullFailed,
    /// The daemon rejected the container specification.
    CreateFailed,
    /// The expected container does not exist.
    ContainerNotFound,
    /// A start was attempted on a running container.
    AlreadyRunning,
    /// Any other runtime failure.
    Runtime,
}

impl ReconcileError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ReconcileErrorKind {
        match self {
            ReconcileError::Image { source } => match source {
                ImageError::Unavailable(_) => ReconcileErrorKind::RuntimeUnavailable,
                ImageError::PullFailed(_) => ReconcileErrorKind::PullFailed,
                ImageError::Runtime(_) => ReconcileErrorKind::Runtime,
            },
            ReconcileError::Container { source } => match source {
                ContainerError::NotFound(_) => ReconcileErrorKind::ContainerNotFound,
                ContainerError::CreateFailed(_) => ReconcileErrorKind::CreateFailed,
                ContainerError::AlreadyRunning(_) => ReconcileErrorKind::AlreadyRunning,
                ContainerError::Unavailable(_) => ReconcileErrorKind::RuntimeUnavailable,
                ContainerError::NotRunning(_) | ContainerError::Runtime(_) => {
                    ReconcileErrorKind::Runtime
                }
            },
        }
    }
}

impl From<ImageError> for ReconcileError {
    fn from(source: ImageError) -> Self {
        ReconcileError::Image { source }
    }
}

impl From<ContainerError> for ReconcileError {
    fn from(source: ContainerError) -> Self {
        ReconcileError::Container { source }
    }
}
