// ABOUTME: Application-wide error types for eosup.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::reconcile::ReconcileError;
use crate::runtime::ConnectError;
use crate::types::{ContainerNameError, ParseImageRefError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid instance name: {0}")]
    InvalidName(#[from] ContainerNameError),

    #[error("invalid image reference: {0}")]
    InvalidImage(#[from] ParseImageRefError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

pub type Result<T> = std::result::Result<T, Error>;
