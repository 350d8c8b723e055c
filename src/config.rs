// ABOUTME: Desired node configuration assembled from CLI arguments.
// ABOUTME: Holds the published defaults for instance name, image, and host port.

use crate::error::Result;
use crate::types::{ContainerName, ImageRef};

pub const DEFAULT_INSTANCE: &str = "eosio";
pub const DEFAULT_IMAGE: &str = "eosio/eos-dev:latest";
pub const DEFAULT_HOST_PORT: &str = "8888";

/// The desired configuration for one node container.
///
/// Immutable per invocation; nothing here survives the operation it was
/// built for.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Normalized container name.
    pub name: ContainerName,
    /// Image to run.
    pub image: ImageRef,
    /// Host port bound to the node's HTTP port.
    pub host_port: String,
    /// Bind mounts as `hostPath:containerPath` specs, in order.
    ///
    /// Passed through to the runtime untouched; invalid specs surface as
    /// a creation failure from the daemon.
    pub binds: Vec<String>,
}

impl NodeConfig {
    /// Build a configuration from optional CLI arguments, applying the
    /// defaults for anything absent. `volumes` is a comma-separated list
    /// of bind specs.
    pub fn from_args(
        name: Option<&str>,
        image: Option<&str>,
        port: Option<&str>,
        volumes: Option<&str>,
    ) -> Result<Self> {
        let name = ContainerName::new(name.unwrap_or(DEFAULT_INSTANCE))?;
        let image = ImageRef::parse(image.unwrap_or(DEFAULT_IMAGE))?;
        let host_port = port.unwrap_or(DEFAULT_HOST_PORT).to_string();
        let binds = volumes
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name,
            image,
            host_port,
            binds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        let config = NodeConfig::from_args(None, None, None, None).unwrap();
        assert_eq!(config.name.as_str(), "/eosio");
        assert_eq!(config.image.to_string(), "eosio/eos-dev:latest");
        assert_eq!(config.host_port, "8888");
        assert!(config.binds.is_empty());
    }

    #[test]
    fn volumes_split_on_commas() {
        let config =
            NodeConfig::from_args(None, None, None, Some("/a:/b, /c:/d ,,/e:/f")).unwrap();
        assert_eq!(config.binds, vec!["/a:/b", "/c:/d", "/e:/f"]);
    }

    #[test]
    fn invalid_name_is_rejected() {
        assert!(NodeConfig::from_args(Some("bad name"), None, None, None).is_err());
    }
}
