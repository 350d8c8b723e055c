// ABOUTME: Container operations trait for the container runtime.
// ABOUTME: Create, start, stop, remove, inspect, and list containers.

use super::sealed::Sealed;
use super::shared_types::{ContainerDetails, ContainerSpec, ContainerSummary};
use crate::types::ContainerId;
use async_trait::async_trait;

/// Container lifecycle operations.
#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// List containers; `all` includes stopped ones.
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, ContainerError>;

    /// Create a container from the given specification.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<ContainerId, ContainerError>;

    /// Get the full configuration of a container.
    async fn inspect_container(&self, id: &ContainerId)
    -> Result<ContainerDetails, ContainerError>;

    /// Start a created or stopped container.
    ///
    /// Not idempotent: starting an already-running container fails with
    /// [`ContainerError::AlreadyRunning`]. Callers must have verified the
    /// state first.
    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Stop a running container.
    async fn stop_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Remove a stopped container.
    async fn remove_container(&self, id: &ContainerId) -> Result<(), ContainerError>;
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container creation rejected: {0}")]
    CreateFailed(String),

    #[error("container already running: {0}")]
    AlreadyRunning(String),

    #[error("container not running: {0}")]
    NotRunning(String),

    #[error("container runtime unavailable: {0}")]
    Unavailable(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
