//! Lottie Bridge Core (platform-agnostic)
//!
//! Keeps a declarative [`AnimationElement`] in sync with a native Lottie player.
//! Platform engines only implement [`NativePlayer`]; segment playback, speed
//! reversal and completion bookkeeping live in [`PlaybackAdapter`].

pub mod adapter;
pub mod config;
pub mod element;
pub mod error;
pub mod headless;
pub mod ids;
pub mod native;
pub mod outputs;
pub mod segment;

// Re-exports for hosts and platform engines
pub use adapter::PlaybackAdapter;
pub use config::AdapterConfig;
pub use element::{AnimationElement, AnimationSource, ElementEvent, ElementNotification, Property};
pub use error::LoadError;
pub use headless::{Composition, HeadlessPlayer};
pub use ids::{ElementId, Generation, GenerationCounter};
pub use native::{
    Completion, CompletionNotifier, CompositionBounds, NativePlayer, NativePlayerFactory,
};
pub use outputs::{AdapterEvent, IgnoreReason, Outputs, PlayKind};
pub use segment::{PlaybackPhase, SegmentBounds, SegmentState};
