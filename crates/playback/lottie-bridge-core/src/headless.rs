//! Headless [`NativePlayer`]: Lottie timing without any rendering.
//!
//! Reads just enough of a Lottie document (`ip`, `op`, `fr` and a few optional
//! header fields) to know the frame range and duration, then advances a frame
//! cursor when [`HeadlessPlayer::tick`] is called. Useful for servers, tests and
//! hosts that render elsewhere but still need the playback state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::LoadError;
use crate::native::{CompletionNotifier, CompositionBounds, NativePlayer};

#[derive(Debug, Deserialize)]
struct LottieHeader {
    ip: f32,
    op: f32,
    fr: f32,
    #[serde(default)]
    w: Option<u32>,
    #[serde(default)]
    h: Option<u32>,
    #[serde(default)]
    nm: Option<String>,
    #[serde(default)]
    v: Option<String>,
}

/// Timing data of a loaded composition.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    pub name: Option<String>,
    pub version: Option<String>,
    /// First frame (`ip`).
    pub in_point: f32,
    /// Frame the composition ends on (`op`).
    pub out_point: f32,
    pub frame_rate: f32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    duration: Duration,
}

impl Composition {
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let header: LottieHeader = serde_json::from_str(text)?;
        if ![header.ip, header.op, header.fr].iter().all(|v| v.is_finite()) {
            return Err(LoadError::InvalidComposition(format!(
                "ip/op/fr must be finite, got {}/{}/{}",
                header.ip, header.op, header.fr
            )));
        }
        if header.fr <= 0.0 {
            return Err(LoadError::InvalidComposition(format!(
                "frame rate must be positive, got {}",
                header.fr
            )));
        }
        if header.op <= header.ip {
            return Err(LoadError::InvalidComposition(format!(
                "out point {} must be after in point {}",
                header.op, header.ip
            )));
        }
        let seconds = (header.op - header.ip) / header.fr;
        let duration = Duration::try_from_secs_f32(seconds).map_err(|err| {
            LoadError::InvalidComposition(format!("duration of {seconds}s: {err}"))
        })?;
        Ok(Self {
            name: header.nm,
            version: header.v,
            in_point: header.ip,
            out_point: header.op,
            frame_rate: header.fr,
            width: header.w,
            height: header.h,
            duration,
        })
    }

    pub fn frame_count(&self) -> f32 {
        self.out_point - self.in_point
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn bounds(&self) -> CompositionBounds {
        CompositionBounds {
            start_frame: self.in_point as i32,
            end_frame: self.out_point as i32,
        }
    }

    /// Frame at normalized `progress` over the whole composition.
    fn frame_at(&self, progress: f32) -> f32 {
        self.in_point + progress.clamp(0.0, 1.0) * self.frame_count()
    }
}

#[derive(Debug)]
pub struct HeadlessPlayer {
    assets_root: Option<PathBuf>,
    composition: Option<Composition>,
    image_assets_folder: Option<String>,
    speed: f32,
    looping: bool,
    min_frame: f32,
    max_frame: f32,
    frame: f32,
    playing: bool,
    notifier: Option<CompletionNotifier>,
}

impl Default for HeadlessPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlayer {
    pub fn new() -> Self {
        Self {
            assets_root: None,
            composition: None,
            image_assets_folder: None,
            speed: 1.0,
            looping: false,
            min_frame: 0.0,
            max_frame: 0.0,
            frame: 0.0,
            playing: false,
            notifier: None,
        }
    }

    /// Resolve file references relative to `root`.
    pub fn with_assets_root(root: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: Some(root.into()),
            ..Self::new()
        }
    }

    pub fn composition(&self) -> Option<&Composition> {
        self.composition.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn frame(&self) -> f32 {
        self.frame
    }

    /// Active playback range in frames.
    pub fn frame_bounds(&self) -> (f32, f32) {
        (self.min_frame, self.max_frame)
    }

    pub fn image_assets_folder(&self) -> Option<&str> {
        self.image_assets_folder.as_deref()
    }

    /// Advance the cursor by `dt` of wall time.
    ///
    /// Looping runs wrap inside the active bounds and never complete. Other runs stop
    /// on the bound they were heading for and report a natural completion.
    pub fn tick(&mut self, dt: Duration) {
        if !self.playing {
            return;
        }
        let Some(comp) = self.composition.as_ref() else {
            return;
        };
        let delta = dt.as_secs_f32() * comp.frame_rate * self.speed;
        if delta == 0.0 {
            return;
        }
        let next = self.frame + delta;
        if (self.min_frame..=self.max_frame).contains(&next) {
            self.frame = next;
            return;
        }

        let span = self.max_frame - self.min_frame;
        if self.looping {
            self.frame = if span > 0.0 {
                self.min_frame + (next - self.min_frame).rem_euclid(span)
            } else {
                self.min_frame
            };
            return;
        }

        self.frame = if delta > 0.0 {
            self.max_frame
        } else {
            self.min_frame
        };
        self.playing = false;
        if let Some(notifier) = &self.notifier {
            notifier.notify(true);
        }
    }

    fn start_frame(&self) -> f32 {
        if self.speed < 0.0 {
            self.max_frame
        } else {
            self.min_frame
        }
    }

    fn at_terminal_frame(&self) -> bool {
        if self.speed < 0.0 {
            self.frame <= self.min_frame
        } else {
            self.frame >= self.max_frame
        }
    }

    fn apply_bounds(&mut self, min: f32, max: f32) {
        let Some(comp) = self.composition.as_ref() else {
            return;
        };
        let lo = min.clamp(comp.in_point, comp.out_point);
        let hi = max.clamp(lo, comp.out_point);
        self.min_frame = lo;
        self.max_frame = hi;
        self.frame = self.frame.clamp(lo, hi);
    }

    fn install(&mut self, comp: Composition) {
        self.min_frame = comp.in_point;
        self.max_frame = comp.out_point;
        self.frame = comp.in_point;
        self.playing = false;
        self.composition = Some(comp);
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        match &self.assets_root {
            Some(root) => root.join(reference),
            None => Path::new(reference).to_path_buf(),
        }
    }
}

impl NativePlayer for HeadlessPlayer {
    fn play(&mut self) {
        if self.composition.is_none() {
            return;
        }
        self.frame = self.start_frame();
        self.playing = true;
    }

    fn resume(&mut self) {
        if self.composition.is_none() {
            return;
        }
        if self.at_terminal_frame() {
            self.frame = self.start_frame();
        }
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn progress(&self) -> f32 {
        match &self.composition {
            Some(comp) => (self.frame - comp.in_point) / comp.frame_count(),
            None => 0.0,
        }
    }

    fn set_progress(&mut self, progress: f32) {
        if let Some(comp) = &self.composition {
            self.frame = comp
                .frame_at(progress)
                .clamp(self.min_frame, self.max_frame);
        }
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn reverse_speed(&mut self) {
        self.speed = -self.speed;
    }

    fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn set_frame_bounds(&mut self, min: i32, max: i32) {
        self.apply_bounds(min as f32, max as f32);
    }

    fn set_progress_bounds(&mut self, min: f32, max: f32) {
        if let Some(comp) = &self.composition {
            let (lo, hi) = (comp.frame_at(min), comp.frame_at(max));
            self.apply_bounds(lo, hi);
        }
    }

    fn duration(&self) -> Duration {
        self.composition
            .as_ref()
            .map_or(Duration::ZERO, Composition::duration)
    }

    fn composition_bounds(&self) -> Option<CompositionBounds> {
        self.composition.as_ref().map(Composition::bounds)
    }

    fn set_image_assets_folder(&mut self, folder: &str) {
        self.image_assets_folder = Some(folder.to_string());
    }

    fn load_from_inline_text(&mut self, text: &str) -> Result<(), LoadError> {
        let comp = Composition::parse(text)?;
        self.install(comp);
        Ok(())
    }

    fn load_from_reference(&mut self, reference: &str) -> Result<(), LoadError> {
        let path = self.resolve(reference);
        let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load_from_inline_text(&text)
    }

    fn clear(&mut self) {
        self.composition = None;
        self.playing = false;
        self.min_frame = 0.0;
        self.max_frame = 0.0;
        self.frame = 0.0;
    }

    fn set_completion_notifier(&mut self, notifier: CompletionNotifier) {
        self.notifier = Some(notifier);
    }
}
