// ABOUTME: Typed progress events and the pull progress accumulator.
// ABOUTME: One event variant per phase, each carrying only that phase's payload.

use crate::runtime::LayerProgress;
use crate::types::ContainerId;
use std::collections::BTreeMap;

/// One phase transition of a `run` operation.
///
/// Emitted to the caller-supplied observer in the order phases occur;
/// ephemeral and never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The desired image is already present locally.
    ImageFound,
    /// An image pull has been opened.
    PullStarted,
    /// A layer reported download progress; carries a snapshot of the
    /// accumulated state for all layers seen so far.
    PullDownloading(PullProgress),
    /// The first layer started extracting.
    PullExtracting,
    /// The pull stream completed.
    PullDone,
    /// An existing container satisfies the desired configuration.
    ContainerFound,
    /// An existing container no longer matches and is being replaced.
    ContainerConfigModified,
    /// A container is being created from the desired specification.
    ContainerCreated,
    /// The container is running.
    ContainerStarted(ContainerId),
}

/// Per-layer byte progress accumulated over one pull.
///
/// The accumulator never regresses: once a layer has been observed, later
/// updates only move its `current` forward or leave it unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullProgress {
    layers: BTreeMap<String, LayerProgress>,
}

impl PullProgress {
    /// Register a layer the daemon has queued but not started.
    pub fn record_waiting(&mut self, layer: &str) {
        self.layers.entry(layer.to_string()).or_default();
    }

    /// Fold one download progress report into the accumulator.
    pub fn record_downloading(&mut self, layer: &str, detail: LayerProgress) {
        let entry = self.layers.entry(layer.to_string()).or_default();
        entry.total = detail.total;
        entry.current = entry.current.max(detail.current);
    }

    /// Overall completion as a percentage: `100 * Σ current / Σ total`
    /// over the layers whose total is known.
    ///
    /// While `Waiting` events are still arriving the denominator is
    /// incomplete, so early values overestimate; this is an accepted
    /// imprecision of the daemon's stream, not a defect.
    pub fn percent(&self) -> f64 {
        let mut current = 0u64;
        let mut total = 0u64;
        for layer in self.layers.values() {
            current += layer.current;
            if layer.total > 0 {
                total += layer.total;
            }
        }
        if total == 0 {
            0.0
        } else {
            100.0 * current as f64 / total as f64
        }
    }

    /// Number of layers seen so far.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Progress of a single layer, if it has been seen.
    pub fn layer(&self, id: &str) -> Option<LayerProgress> {
        self.layers.get(id).copied()
    }
}
