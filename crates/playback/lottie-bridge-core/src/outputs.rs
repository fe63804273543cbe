//! Diagnostic outputs from the adapter.
//!
//! The element only sees `duration`, `is_playing` and the finished notification.
//! Hosts that want a fuller picture (logging panels, tests, telemetry) drain these
//! events from [`PlaybackAdapter::take_outputs`](crate::adapter::PlaybackAdapter::take_outputs).

use serde::{Deserialize, Serialize};

use crate::ids::Generation;

/// How a playback run was started.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayKind {
    Restart,
    Resume,
    ProgressSegment,
    FrameSegment,
    AutoPlay,
}

/// Why a native completion did not reach the element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The engine ended the run without reaching the end.
    NotFinished,
    /// A newer request superseded the one the completion belongs to.
    Stale,
    /// No element is attached or the native player is gone.
    Detached,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AdapterEvent {
    CompositionLoaded {
        duration_ms: u64,
    },
    CompositionCleared,
    LoadFailed {
        message: String,
    },
    PlaybackStarted {
        generation: Generation,
        kind: PlayKind,
    },
    PlaybackPaused,
    Seeked {
        progress: f32,
    },
    PlaybackFinished {
        generation: Generation,
    },
    CompletionIgnored {
        generation: Generation,
        reason: IgnoreReason,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<AdapterEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: AdapterEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
