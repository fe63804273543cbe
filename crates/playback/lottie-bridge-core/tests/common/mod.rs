#![allow(dead_code)]
//! Shared helpers: a NativePlayer wrapper that records every call it receives.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lottie_bridge_core::{
    AdapterConfig, AnimationElement, CompletionNotifier, CompositionBounds, HeadlessPlayer,
    LoadError, NativePlayer, PlaybackAdapter,
};

#[derive(Clone, Debug, PartialEq)]
pub enum NativeCall {
    Created,
    Play,
    Resume,
    Pause,
    SetProgress(f32),
    SetSpeed(f32),
    ReverseSpeed,
    SetLoop(bool),
    SetFrameBounds(i32, i32),
    SetProgressBounds(f32, f32),
    SetImageAssetsFolder(String),
    LoadInline,
    LoadReference(String),
    Clear,
}

pub type CallLog = Rc<RefCell<Vec<NativeCall>>>;

/// Headless engine plus a shared call log that survives player rebuilds.
pub struct RecordingPlayer {
    inner: HeadlessPlayer,
    log: CallLog,
    notifier: Option<CompletionNotifier>,
}

impl RecordingPlayer {
    pub fn new(log: CallLog) -> Self {
        log.borrow_mut().push(NativeCall::Created);
        Self {
            inner: HeadlessPlayer::with_assets_root(lottie_bridge_test_fixtures::fixtures_root()),
            log,
            notifier: None,
        }
    }

    pub fn inner(&self) -> &HeadlessPlayer {
        &self.inner
    }

    pub fn tick(&mut self, dt: Duration) {
        self.inner.tick(dt);
    }

    /// Notifier handed over by the latest play request.
    pub fn notifier(&self) -> Option<CompletionNotifier> {
        self.notifier.clone()
    }

    fn record(&self, call: NativeCall) {
        self.log.borrow_mut().push(call);
    }
}

impl NativePlayer for RecordingPlayer {
    fn play(&mut self) {
        self.record(NativeCall::Play);
        self.inner.play();
    }
    fn resume(&mut self) {
        self.record(NativeCall::Resume);
        self.inner.resume();
    }
    fn pause(&mut self) {
        self.record(NativeCall::Pause);
        self.inner.pause();
    }
    fn progress(&self) -> f32 {
        self.inner.progress()
    }
    fn set_progress(&mut self, progress: f32) {
        self.record(NativeCall::SetProgress(progress));
        self.inner.set_progress(progress);
    }
    fn speed(&self) -> f32 {
        self.inner.speed()
    }
    fn set_speed(&mut self, speed: f32) {
        self.record(NativeCall::SetSpeed(speed));
        self.inner.set_speed(speed);
    }
    fn reverse_speed(&mut self) {
        self.record(NativeCall::ReverseSpeed);
        self.inner.reverse_speed();
    }
    fn set_loop(&mut self, looping: bool) {
        self.record(NativeCall::SetLoop(looping));
        self.inner.set_loop(looping);
    }
    fn set_frame_bounds(&mut self, min: i32, max: i32) {
        self.record(NativeCall::SetFrameBounds(min, max));
        self.inner.set_frame_bounds(min, max);
    }
    fn set_progress_bounds(&mut self, min: f32, max: f32) {
        self.record(NativeCall::SetProgressBounds(min, max));
        self.inner.set_progress_bounds(min, max);
    }
    fn duration(&self) -> Duration {
        self.inner.duration()
    }
    fn composition_bounds(&self) -> Option<CompositionBounds> {
        self.inner.composition_bounds()
    }
    fn set_image_assets_folder(&mut self, folder: &str) {
        self.record(NativeCall::SetImageAssetsFolder(folder.to_string()));
        self.inner.set_image_assets_folder(folder);
    }
    fn load_from_inline_text(&mut self, text: &str) -> Result<(), LoadError> {
        self.record(NativeCall::LoadInline);
        self.inner.load_from_inline_text(text)
    }
    fn load_from_reference(&mut self, reference: &str) -> Result<(), LoadError> {
        self.record(NativeCall::LoadReference(reference.to_string()));
        self.inner.load_from_reference(reference)
    }
    fn clear(&mut self) {
        self.record(NativeCall::Clear);
        self.inner.clear();
    }
    fn set_completion_notifier(&mut self, notifier: CompletionNotifier) {
        self.notifier = Some(notifier.clone());
        self.inner.set_completion_notifier(notifier);
    }
}

pub type TestAdapter = PlaybackAdapter<Box<dyn FnMut() -> RecordingPlayer>>;

pub fn new_adapter_with(cfg: AdapterConfig) -> (TestAdapter, CallLog) {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let factory_log = log.clone();
    let factory: Box<dyn FnMut() -> RecordingPlayer> =
        Box::new(move || RecordingPlayer::new(factory_log.clone()));
    (PlaybackAdapter::with_config(factory, cfg), log)
}

pub fn new_adapter() -> (TestAdapter, CallLog) {
    new_adapter_with(AdapterConfig::default())
}

pub fn fixture(name: &str) -> String {
    lottie_bridge_test_fixtures::compositions::json(name).unwrap()
}

/// Adapter attached to an element showing the named fixture, with the call log
/// cleared after attach.
pub fn attached(name: &str) -> (TestAdapter, AnimationElement, CallLog) {
    attached_with(name, AdapterConfig::default())
}

pub fn attached_with(name: &str, cfg: AdapterConfig) -> (TestAdapter, AnimationElement, CallLog) {
    let (mut adapter, log) = new_adapter_with(cfg);
    let mut element = AnimationElement::new();
    element.set_animation_json(fixture(name));
    adapter.attach(&mut element);
    log.borrow_mut().clear();
    (adapter, element, log)
}

pub fn calls(log: &CallLog) -> Vec<NativeCall> {
    log.borrow().clone()
}

pub fn count(log: &CallLog, call: &NativeCall) -> usize {
    log.borrow().iter().filter(|c| *c == call).count()
}

pub fn clear(log: &CallLog) {
    log.borrow_mut().clear();
}

pub fn player(adapter: &TestAdapter) -> &RecordingPlayer {
    adapter.native().expect("native player should be attached")
}
