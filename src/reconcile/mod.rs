// ABOUTME: Reconciliation core: desired node configuration vs. daemon state.
// ABOUTME: Exports the reconciler, progress events, and the canonical node spec.

mod error;
mod progress;
mod reconciler;
mod spec;

pub use error::{ReconcileError, ReconcileErrorKind};
pub use progress::{ProgressEvent, PullProgress};
pub use reconciler::Reconciler;
pub use spec::{NODE_HTTP_PORT, NODE_P2P_PORT, node_container_spec, spec_matches};
