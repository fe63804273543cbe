//! Capability surface the adapter consumes from a platform playback engine.
//!
//! Platform engines implement [`NativePlayer`]; the adapter owns exactly one instance
//! per view and rebuilds it through a [`NativePlayerFactory`] whenever the source
//! changes.

use std::sync::mpsc::Sender;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::ids::Generation;

/// Frame range of the loaded composition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionBounds {
    pub start_frame: i32,
    pub end_frame: i32,
}

/// A completion reported by a native engine, tagged with the view and generation
/// it was armed with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Epoch of the native view that reported it; advances on every rebuild.
    pub view: Generation,
    pub generation: Generation,
    pub finished_naturally: bool,
}

/// Handle a native engine calls when a play-through ends.
///
/// Cloneable and cheap; the engine may call it from any thread. Completions are
/// queued and only reach the element when the adapter polls them on the UI thread.
#[derive(Clone, Debug)]
pub struct CompletionNotifier {
    tx: Sender<Completion>,
    view: Generation,
    generation: Generation,
}

impl CompletionNotifier {
    pub(crate) fn new(tx: Sender<Completion>, view: Generation, generation: Generation) -> Self {
        Self {
            tx,
            view,
            generation,
        }
    }

    pub fn view(&self) -> Generation {
        self.view
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Report the end of a play-through. `finished_naturally` is false when the
    /// engine ended the run for any reason other than reaching the end.
    pub fn notify(&self, finished_naturally: bool) {
        // The adapter may already be gone; nobody is left to care.
        let _ = self.tx.send(Completion {
            view: self.view,
            generation: self.generation,
            finished_naturally,
        });
    }
}

/// Playback engine capability. All calls are synchronous and made on the UI thread.
pub trait NativePlayer {
    /// Start playback from the beginning of the active bounds.
    fn play(&mut self);
    /// Continue from the current position.
    fn resume(&mut self);
    /// Stop advancing. Must never fire a completion.
    fn pause(&mut self);

    /// Normalized position in [0, 1] over the full composition.
    fn progress(&self) -> f32;
    fn set_progress(&mut self, progress: f32);

    fn speed(&self) -> f32;
    fn set_speed(&mut self, speed: f32);
    /// Invert the sign of the current speed.
    fn reverse_speed(&mut self);

    fn set_loop(&mut self, looping: bool);

    fn set_frame_bounds(&mut self, min: i32, max: i32);
    fn set_progress_bounds(&mut self, min: f32, max: f32);

    /// Duration of the loaded composition; zero when nothing is loaded.
    fn duration(&self) -> Duration;
    fn composition_bounds(&self) -> Option<CompositionBounds>;

    fn has_composition(&self) -> bool {
        self.composition_bounds().is_some()
    }

    fn set_image_assets_folder(&mut self, folder: &str);

    fn load_from_inline_text(&mut self, text: &str) -> Result<(), LoadError>;
    fn load_from_reference(&mut self, reference: &str) -> Result<(), LoadError>;
    /// Drop any loaded composition.
    fn clear(&mut self);

    /// Replace the handle completions are reported through.
    fn set_completion_notifier(&mut self, notifier: CompletionNotifier);
}

/// Builds fresh native players.
pub trait NativePlayerFactory {
    type Player: NativePlayer;

    fn create(&mut self) -> Self::Player;
}

impl<P, F> NativePlayerFactory for F
where
    P: NativePlayer,
    F: FnMut() -> P,
{
    type Player = P;

    fn create(&mut self) -> P {
        self()
    }
}
