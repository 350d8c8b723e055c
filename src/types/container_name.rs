// ABOUTME: Normalized container name newtype.
// ABOUTME: Always stored with exactly one leading slash, as the daemon reports names.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerNameError {
    #[error("container name cannot be empty")]
    Empty,

    #[error("invalid character in container name: '{0}'")]
    InvalidChar(char),
}

/// A container name in the daemon's normalized form.
///
/// The Docker API reports container names with a leading `/`; every lookup
/// and comparison in this crate goes through the normalized form so a name
/// matches regardless of how the caller spelled it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(value: &str) -> Result<Self, ContainerNameError> {
        let bare = value.strip_prefix('/').unwrap_or(value);

        if bare.is_empty() {
            return Err(ContainerNameError::Empty);
        }

        for c in bare.chars() {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '.' && c != '-' {
                return Err(ContainerNameError::InvalidChar(c));
            }
        }

        Ok(Self(format!("/{bare}")))
    }

    /// The normalized form, with the leading slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare form the daemon expects when creating a container.
    pub fn trimmed(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
