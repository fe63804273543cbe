//! Adapter configuration.

use serde::{Deserialize, Serialize};

/// Behaviour switches for [`PlaybackAdapter`](crate::adapter::PlaybackAdapter).
/// Hosts may deserialize this from JSON; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Restore the full composition frame range before applying progress
    /// bounds when a frame segment left the range restricted.
    pub clear_frame_range_on_progress_segment: bool,

    /// Drop completions whose generation no longer matches the latest play
    /// request. When disabled only the attachment/handle checks apply.
    pub ignore_stale_completions: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            clear_frame_range_on_progress_segment: true,
            ignore_stale_completions: true,
        }
    }
}
