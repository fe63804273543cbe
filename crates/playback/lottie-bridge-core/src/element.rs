//! Declarative animation element: the desired playback state owned by the host UI.
//!
//! The element never talks to a native player. Event-firing methods and property
//! setters queue [`ElementEvent`]s while an adapter is subscribed; the adapter drains
//! them (see [`PlaybackAdapter::process`](crate::adapter::PlaybackAdapter::process)) and
//! writes back the derived `duration` / `is_playing` fields.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

/// Observable element properties. Keys the adapter's property dispatch table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Property {
    AnimationJson,
    Animation,
    Speed,
    Loop,
    Progress,
    AutoPlay,
    ImageAssetsFolder,
}

/// Events raised by the element towards its subscribed adapter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ElementEvent {
    Play,
    Pause,
    PlaySegmentByProgress { from: f32, to: f32 },
    PlaySegmentByFrame { from: i32, to: i32 },
    PropertyChanged(Property),
}

/// Notifications raised by the element towards the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementNotification {
    PlaybackFinished,
}

/// Effective animation source after resolving the two source fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationSource<'a> {
    Inline(&'a str),
    Reference(&'a str),
    Empty,
}

#[derive(Debug)]
pub struct AnimationElement {
    id: ElementId,
    animation_json: Option<String>,
    animation: Option<String>,
    speed: f32,
    looping: bool,
    progress: f32,
    auto_play: bool,
    image_assets_folder: Option<String>,

    // Written by the adapter.
    duration: Duration,
    is_playing: bool,

    subscribed: bool,
    events: VecDeque<ElementEvent>,
    notifications: Vec<ElementNotification>,
    finished_count: u32,
}

impl Default for AnimationElement {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationElement {
    pub fn new() -> Self {
        Self {
            id: ElementId::new(),
            animation_json: None,
            animation: None,
            speed: 1.0,
            looping: false,
            progress: 0.0,
            auto_play: false,
            image_assets_folder: None,
            duration: Duration::ZERO,
            is_playing: false,
            subscribed: false,
            events: VecDeque::new(),
            notifications: Vec::new(),
            finished_count: 0,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    // ----- event-firing commands -----

    pub fn play(&mut self) {
        self.raise(ElementEvent::Play);
    }

    pub fn pause(&mut self) {
        self.raise(ElementEvent::Pause);
    }

    /// Play the normalized range between `from` and `to`; `from > to` plays backwards.
    pub fn play_segment_by_progress(&mut self, from: f32, to: f32) {
        self.raise(ElementEvent::PlaySegmentByProgress { from, to });
    }

    /// Play the frame range between `from` and `to`; `from > to` plays backwards.
    pub fn play_segment_by_frame(&mut self, from: i32, to: i32) {
        self.raise(ElementEvent::PlaySegmentByFrame { from, to });
    }

    // ----- caller-written properties -----

    pub fn animation_json(&self) -> Option<&str> {
        self.animation_json.as_deref()
    }

    pub fn set_animation_json(&mut self, json: impl Into<String>) {
        self.animation_json = Some(json.into());
        self.raise(ElementEvent::PropertyChanged(Property::AnimationJson));
    }

    pub fn animation(&self) -> Option<&str> {
        self.animation.as_deref()
    }

    /// Set the file reference the native player should load.
    pub fn set_animation(&mut self, reference: impl Into<String>) {
        self.animation = Some(reference.into());
        self.raise(ElementEvent::PropertyChanged(Property::Animation));
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.raise(ElementEvent::PropertyChanged(Property::Speed));
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
        self.raise(ElementEvent::PropertyChanged(Property::Loop));
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Seek request; clamped into [0, 1]. NaN is treated as 0.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.raise(ElementEvent::PropertyChanged(Property::Progress));
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    pub fn set_auto_play(&mut self, auto_play: bool) {
        self.auto_play = auto_play;
        self.raise(ElementEvent::PropertyChanged(Property::AutoPlay));
    }

    pub fn image_assets_folder(&self) -> Option<&str> {
        self.image_assets_folder.as_deref()
    }

    /// An empty folder is ignored and never replaces one set earlier.
    pub fn set_image_assets_folder(&mut self, folder: impl Into<String>) {
        let folder = folder.into();
        if folder.is_empty() {
            return;
        }
        self.image_assets_folder = Some(folder);
        self.raise(ElementEvent::PropertyChanged(Property::ImageAssetsFolder));
    }

    /// Resolve the effective source. Inline text wins over a file reference;
    /// empty strings count as absent.
    pub fn source(&self) -> AnimationSource<'_> {
        match (non_empty(&self.animation_json), non_empty(&self.animation)) {
            (Some(json), _) => AnimationSource::Inline(json),
            (None, Some(reference)) => AnimationSource::Reference(reference),
            (None, None) => AnimationSource::Empty,
        }
    }

    // ----- adapter-written state -----

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub(crate) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub(crate) fn set_is_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub(crate) fn playback_finished(&mut self) {
        self.finished_count = self.finished_count.wrapping_add(1);
        self.notifications.push(ElementNotification::PlaybackFinished);
    }

    /// Number of natural play-through completions reported so far.
    pub fn playback_finished_count(&self) -> u32 {
        self.finished_count
    }

    /// Drain notifications raised towards the host.
    pub fn take_notifications(&mut self) -> Vec<ElementNotification> {
        std::mem::take(&mut self.notifications)
    }

    // ----- subscription plumbing -----

    pub fn has_subscriber(&self) -> bool {
        self.subscribed
    }

    pub(crate) fn subscribe(&mut self) {
        self.subscribed = true;
    }

    /// Drops the subscription together with any events still queued for it.
    pub(crate) fn unsubscribe(&mut self) {
        self.subscribed = false;
        self.events.clear();
    }

    pub(crate) fn next_event(&mut self) -> Option<ElementEvent> {
        self.events.pop_front()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn raise(&mut self, event: ElementEvent) {
        if self.subscribed {
            self.events.push_back(event);
        }
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|v| !v.is_empty())
}
