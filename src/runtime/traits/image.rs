// ABOUTME: Image operations trait for the container runtime.
// ABOUTME: List local images and stream raw pull progress events.

use super::sealed::Sealed;
use super::shared_types::{ImageRecord, PullEvent};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// The raw pull event stream: one item per daemon progress record,
/// terminating on completion or error.
pub type PullEventStream = Pin<Box<dyn Stream<Item = Result<PullEvent, ImageError>> + Send>>;

/// Image operations: list local images, pull with progress.
#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// List all images known to the daemon.
    async fn list_images(&self) -> Result<Vec<ImageRecord>, ImageError>;

    /// Open a pull for `repository:tag` and return the daemon's raw
    /// progress event stream. The pull is not complete until the stream
    /// has been fully consumed.
    async fn pull_image(&self, repository: &str, tag: &str)
    -> Result<PullEventStream, ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("container runtime unavailable: {0}")]
    Unavailable(String),

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
