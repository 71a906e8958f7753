//! Collectors bundled with the harness.

mod heartbeat;

pub use heartbeat::Heartbeat;

use harvest_pipeline::register_collector;

/// Namespace of the bundled collectors.
pub const NAMESPACE: &str = "harvest";

/// Register the bundled collectors in the process-wide registry.
pub fn register_builtin() {
    register_collector(NAMESPACE, "Heartbeat", Heartbeat::new);
}
