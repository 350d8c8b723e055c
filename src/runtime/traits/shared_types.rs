// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: Image and container snapshots, the desired container spec, and pull events.

use crate::types::{ContainerId, ContainerName, ImageId, ImageRef};
use serde_json::Value;

/// A locally available image, as reported by the daemon.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// Image ID.
    pub id: ImageId,
    /// `repository:tag` entries this image is known under.
    pub tags: Vec<String>,
}

impl ImageRecord {
    /// Whether this image carries the given `repository:tag` reference.
    pub fn has_tag(&self, reference: &str) -> bool {
        self.tags.iter().any(|t| t == reference)
    }
}

/// Summary information about a container from a listing.
#[derive(Debug, Clone)]
pub struct ContainerSummary {
    /// Container ID.
    pub id: ContainerId,
    /// Names as the daemon reports them, each with a leading slash.
    pub names: Vec<String>,
}

/// Full inspection snapshot of a single container.
///
/// `config` and `host_config` are the daemon's wire-format configuration
/// objects; the reconciler matches the desired spec against them without
/// caring which defaulted fields the daemon has added.
#[derive(Debug, Clone)]
pub struct ContainerDetails {
    /// Container ID.
    pub id: ContainerId,
    /// Name with its leading slash.
    pub name: String,
    /// Whether the container is currently running.
    pub running: bool,
    /// The `Config` object from inspection.
    pub config: Value,
    /// The `HostConfig` object from inspection.
    pub host_config: Value,
}

/// The canonical desired specification for the node container.
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    /// Normalized container name.
    pub name: ContainerName,
    /// Image to run.
    pub image: ImageRef,
    /// Command to run (overrides image CMD).
    pub command: Vec<String>,
    /// Exposed ports as `port/proto` keys.
    pub exposed_ports: Vec<String>,
    /// Bind mounts as `hostPath:containerPath` specs, in order.
    pub binds: Vec<String>,
    /// Host port bindings.
    pub port_bindings: Vec<PortBinding>,
}

/// A single host port binding for an exposed container port.
#[derive(Debug, Clone)]
pub struct PortBinding {
    /// Container side, as a `port/proto` key.
    pub container_port: String,
    /// Host IP to bind to; empty means all interfaces.
    pub host_ip: String,
    /// Host port.
    pub host_port: String,
}

/// One raw event from the daemon's image-pull stream, exactly as emitted.
#[derive(Debug, Clone)]
pub struct PullEvent {
    /// Status line, e.g. `Waiting`, `Downloading`, `Extracting`.
    pub status: String,
    /// Layer ID the event applies to, when the daemon provides one.
    pub id: Option<String>,
    /// Byte progress for the layer, when the daemon provides it.
    pub detail: Option<LayerProgress>,
}

/// Byte progress of a single image layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerProgress {
    /// Bytes transferred so far.
    pub current: u64,
    /// Total bytes, zero until the daemon has announced it.
    pub total: u64,
}
