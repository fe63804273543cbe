//! PlaybackAdapter: translates element events into native player calls.
//!
//! One adapter per visible animation view. It owns the native player, the segment
//! state and the completion queue; the element is borrowed per call and only ever
//! receives `duration`, `is_playing` and the finished notification.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

use log::{debug, warn};

use crate::config::AdapterConfig;
use crate::element::{AnimationElement, AnimationSource, ElementEvent, Property};
use crate::ids::{ElementId, Generation, GenerationCounter};
use crate::native::{Completion, CompletionNotifier, NativePlayer, NativePlayerFactory};
use crate::outputs::{AdapterEvent, IgnoreReason, Outputs, PlayKind};
use crate::segment::{PlaybackPhase, SegmentBounds, SegmentState};

type PropertyHandler<F> = fn(&mut PlaybackAdapter<F>, &mut AnimationElement);

/// Completion queue plus the stamps of the current native view and of the latest
/// play request.
struct CompletionChannel {
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    views: GenerationCounter,
    generations: GenerationCounter,
}

impl CompletionChannel {
    fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            views: GenerationCounter::new(),
            generations: GenerationCounter::new(),
        }
    }

    /// Start a new generation and hand the player a notifier stamped with it.
    fn arm<P: NativePlayer + ?Sized>(&mut self, native: &mut P) -> Generation {
        let generation = self.generations.advance();
        native.set_completion_notifier(CompletionNotifier::new(
            self.tx.clone(),
            self.views.current(),
            generation,
        ));
        generation
    }

    /// The native view was dropped: nothing it armed may ever be delivered.
    fn retire_view(&mut self) {
        self.views.advance();
        self.invalidate();
    }

    /// Make every outstanding notifier stale without arming a new one.
    fn invalidate(&mut self) {
        self.generations.advance();
    }
}

pub struct PlaybackAdapter<F: NativePlayerFactory> {
    cfg: AdapterConfig,
    factory: F,
    native: Option<F::Player>,
    state: SegmentState,
    completions: CompletionChannel,
    attached: Option<ElementId>,
    outputs: Outputs,
}

impl<F: NativePlayerFactory> PlaybackAdapter<F> {
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, AdapterConfig::default())
    }

    pub fn with_config(factory: F, cfg: AdapterConfig) -> Self {
        Self {
            cfg,
            factory,
            native: None,
            state: SegmentState::new(),
            completions: CompletionChannel::new(),
            attached: None,
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.cfg
    }

    pub fn native(&self) -> Option<&F::Player> {
        self.native.as_ref()
    }

    /// Direct access for hosts that drive the engine (e.g. ticking a headless player).
    pub fn native_mut(&mut self) -> Option<&mut F::Player> {
        self.native.as_mut()
    }

    pub fn segment_state(&self) -> SegmentState {
        self.state
    }

    pub fn reversed(&self) -> bool {
        self.state.reversed()
    }

    pub fn frame_range_restricted(&self) -> bool {
        self.state.frame_range_restricted()
    }

    pub fn attached_element(&self) -> Option<ElementId> {
        self.attached
    }

    pub fn is_attached_to(&self, element: &AnimationElement) -> bool {
        self.attached == Some(element.id())
    }

    /// Generation of the latest play request.
    pub fn generation(&self) -> Generation {
        self.completions.generations.current()
    }

    /// Drain diagnostic events accumulated since the last call.
    pub fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }

    // ----- lifecycle -----

    /// Subscribe to `element`, realize the native view if needed and load the
    /// element's current source.
    pub fn attach(&mut self, element: &mut AnimationElement) {
        if self.is_attached_to(element) {
            return;
        }
        if let Some(previous) = self.attached.take() {
            warn!(
                "attach: replacing element {:?}; the previous element should be detached first",
                previous.0
            );
            self.teardown_native();
        }

        element.subscribe();
        self.attached = Some(element.id());
        if self.native.is_none() {
            self.native = Some(self.factory.create());
        }
        if let Some(native) = self.native.as_mut() {
            apply_element_settings(native, element, &self.state);
        }
        debug!("attach: element {:?}", element.id().0);
        self.configure_animation(element);
    }

    /// Unsubscribe from `element` and drop the native view together with all
    /// segment state. A no-op for an element that is not attached.
    pub fn detach(&mut self, element: &mut AnimationElement) {
        if !self.is_attached_to(element) {
            debug!("detach: element {:?} is not attached", element.id().0);
            return;
        }
        element.unsubscribe();
        element.set_is_playing(false);
        self.attached = None;
        self.teardown_native();
        debug!("detach: element {:?}", element.id().0);
    }

    fn teardown_native(&mut self) {
        self.native = None;
        self.state.clear();
        self.completions.retire_view();
    }

    // ----- dispatch -----

    /// Drain every event queued on `element`, then deliver pending completions.
    pub fn process(&mut self, element: &mut AnimationElement) {
        while let Some(event) = element.next_event() {
            self.handle(element, event);
        }
        self.poll_completions(element);
    }

    /// React to a single element event.
    pub fn handle(&mut self, element: &mut AnimationElement, event: ElementEvent) {
        if !self.is_attached_to(element) {
            debug!("handle: dropping {event:?} for an element that is not attached");
            return;
        }
        match event {
            ElementEvent::Play => self.on_play(element),
            ElementEvent::Pause => self.on_pause(element),
            ElementEvent::PlaySegmentByProgress { from, to } => {
                self.on_play_segment_by_progress(element, from, to)
            }
            ElementEvent::PlaySegmentByFrame { from, to } => {
                self.on_play_segment_by_frame(element, from, to)
            }
            ElementEvent::PropertyChanged(property) => {
                if let Some(handler) = Self::property_handler(property) {
                    handler(self, element);
                }
            }
        }
    }

    fn property_handler(property: Property) -> Option<PropertyHandler<F>> {
        match property {
            Property::AnimationJson | Property::Animation => {
                Some(Self::on_source_changed as PropertyHandler<F>)
            }
            Property::Speed => Some(Self::on_speed_changed as PropertyHandler<F>),
            Property::Loop => Some(Self::on_loop_changed as PropertyHandler<F>),
            Property::Progress => Some(Self::on_progress_changed as PropertyHandler<F>),
            Property::ImageAssetsFolder => {
                Some(Self::on_image_assets_folder_changed as PropertyHandler<F>)
            }
            // Only read while loading.
            Property::AutoPlay => None,
        }
    }

    // ----- playback commands -----

    pub fn on_play(&mut self, element: &mut AnimationElement) {
        let Some(native) = loaded(&mut self.native) else {
            return;
        };
        let generation = self.completions.arm(native);
        // Resuming is only safe when no segment left the player reversed or
        // restricted; otherwise the full-range reset must run first.
        let resumable = self.state.phase() == PlaybackPhase::ForwardFullRange;
        let kind = if resumable && native.progress() > 0.0 {
            native.resume();
            PlayKind::Resume
        } else {
            self.state.reset(native);
            native.play();
            PlayKind::Restart
        };
        element.set_is_playing(true);
        debug!("play: {kind:?} generation={}", generation.0);
        self.outputs
            .push_event(AdapterEvent::PlaybackStarted { generation, kind });
    }

    pub fn on_pause(&mut self, element: &mut AnimationElement) {
        let Some(native) = self.native.as_mut() else {
            return;
        };
        native.pause();
        self.completions.invalidate();
        element.set_is_playing(false);
        self.outputs.push_event(AdapterEvent::PlaybackPaused);
    }

    pub fn on_play_segment_by_progress(
        &mut self,
        element: &mut AnimationElement,
        from: f32,
        to: f32,
    ) {
        if from.is_nan() || to.is_nan() {
            warn!("progress segment ({from}, {to}) ignored: bounds must be numbers");
            return;
        }
        let Some(native) = loaded(&mut self.native) else {
            return;
        };
        if self.cfg.clear_frame_range_on_progress_segment {
            self.state.restore_frame_range(native);
        }
        let bounds = SegmentBounds::plan(from.clamp(0.0, 1.0), to.clamp(0.0, 1.0));
        native.set_progress_bounds(bounds.lo, bounds.hi);
        self.start_segment(element, bounds.needs_reverse, PlayKind::ProgressSegment);
    }

    pub fn on_play_segment_by_frame(
        &mut self,
        element: &mut AnimationElement,
        from: i32,
        to: i32,
    ) {
        let Some(native) = loaded(&mut self.native) else {
            return;
        };
        let bounds = SegmentBounds::plan(from, to);
        self.state.restrict_frames(native, bounds.lo, bounds.hi);
        self.start_segment(element, bounds.needs_reverse, PlayKind::FrameSegment);
    }

    fn start_segment(
        &mut self,
        element: &mut AnimationElement,
        needs_reverse: bool,
        kind: PlayKind,
    ) {
        let Some(native) = self.native.as_mut() else {
            return;
        };
        self.state.reconcile_direction(native, needs_reverse);
        let generation = self.completions.arm(native);
        native.play();
        element.set_is_playing(true);
        debug!(
            "segment: {kind:?} phase={:?} generation={}",
            self.state.phase(),
            generation.0
        );
        self.outputs
            .push_event(AdapterEvent::PlaybackStarted { generation, kind });
    }

    // ----- property handlers -----

    /// Rebuild the native player from the element's current source.
    pub fn on_source_changed(&mut self, element: &mut AnimationElement) {
        self.teardown_native();
        let mut native = self.factory.create();
        apply_element_settings(&mut native, element, &self.state);
        self.native = Some(native);
        self.configure_animation(element);
    }

    pub fn on_speed_changed(&mut self, element: &mut AnimationElement) {
        if let Some(native) = self.native.as_mut() {
            native.set_speed(self.state.native_speed(element.speed()));
        }
    }

    /// A progress write is a seek: pause first, then move.
    pub fn on_progress_changed(&mut self, element: &mut AnimationElement) {
        let Some(native) = self.native.as_mut() else {
            return;
        };
        native.pause();
        self.completions.invalidate();
        let progress = element.progress();
        native.set_progress(progress);
        element.set_is_playing(false);
        self.outputs.push_event(AdapterEvent::Seeked { progress });
    }

    pub fn on_loop_changed(&mut self, element: &mut AnimationElement) {
        if let Some(native) = self.native.as_mut() {
            native.set_loop(element.looping());
        }
    }

    /// An empty folder never clears one set earlier.
    pub fn on_image_assets_folder_changed(&mut self, element: &mut AnimationElement) {
        let Some(native) = self.native.as_mut() else {
            return;
        };
        if let Some(folder) = element.image_assets_folder().filter(|f| !f.is_empty()) {
            native.set_image_assets_folder(folder);
        }
    }

    // ----- loading -----

    fn configure_animation(&mut self, element: &mut AnimationElement) {
        let Some(native) = self.native.as_mut() else {
            return;
        };
        let loaded = match element.source() {
            AnimationSource::Inline(text) => Some(native.load_from_inline_text(text)),
            AnimationSource::Reference(reference) => Some(native.load_from_reference(reference)),
            AnimationSource::Empty => None,
        };
        match loaded {
            Some(Ok(())) => {
                let duration = native.duration();
                element.set_duration(duration);
                debug!("load: composition ready, duration={duration:?}");
                self.outputs.push_event(AdapterEvent::CompositionLoaded {
                    duration_ms: duration.as_millis() as u64,
                });
            }
            Some(Err(err)) => {
                warn!("load: failed to load composition: {err}");
                native.clear();
                element.set_duration(Duration::ZERO);
                self.outputs.push_event(AdapterEvent::LoadFailed {
                    message: err.to_string(),
                });
            }
            None => {
                native.clear();
                element.set_duration(Duration::ZERO);
                self.outputs.push_event(AdapterEvent::CompositionCleared);
            }
        }

        if element.auto_play() && native.has_composition() {
            let generation = self.completions.arm(native);
            native.play();
            element.set_is_playing(true);
            self.outputs.push_event(AdapterEvent::PlaybackStarted {
                generation,
                kind: PlayKind::AutoPlay,
            });
        } else {
            element.set_is_playing(false);
        }
    }

    // ----- completions -----

    /// Deliver queued native completions. Returns how many reached the element.
    pub fn poll_completions(&mut self, element: &mut AnimationElement) -> usize {
        let mut delivered = 0;
        while let Ok(completion) = self.completions.rx.try_recv() {
            let generation = completion.generation;
            let reason = if !completion.finished_naturally {
                Some(IgnoreReason::NotFinished)
            } else if self.native.is_none()
                || !self.is_attached_to(element)
                || !self.completions.views.is_current(completion.view)
            {
                Some(IgnoreReason::Detached)
            } else if self.cfg.ignore_stale_completions
                && !self.completions.generations.is_current(generation)
            {
                Some(IgnoreReason::Stale)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    debug!("completion: ignored generation={} ({reason:?})", generation.0);
                    self.outputs
                        .push_event(AdapterEvent::CompletionIgnored { generation, reason });
                }
                None => {
                    element.set_is_playing(false);
                    element.playback_finished();
                    // A duplicate report for the same run must not finish twice.
                    self.completions.invalidate();
                    self.outputs
                        .push_event(AdapterEvent::PlaybackFinished { generation });
                    delivered += 1;
                }
            }
        }
        delivered
    }
}

/// The native view, if it holds a composition. A view left empty by a failed or
/// empty load has nothing to play and would never complete.
fn loaded<P: NativePlayer>(native: &mut Option<P>) -> Option<&mut P> {
    match native.as_mut() {
        Some(native) if native.has_composition() => Some(native),
        Some(_) => {
            debug!("play: ignored, no composition loaded");
            None
        }
        None => None,
    }
}

/// Push the element's speed, loop flag and image folder onto a fresh or reused view.
fn apply_element_settings<P: NativePlayer + ?Sized>(
    native: &mut P,
    element: &AnimationElement,
    state: &SegmentState,
) {
    native.set_speed(state.native_speed(element.speed()));
    native.set_loop(element.looping());
    if let Some(folder) = element.image_assets_folder().filter(|f| !f.is_empty()) {
        native.set_image_assets_folder(folder);
    }
}
