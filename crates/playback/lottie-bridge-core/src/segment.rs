//! Segment playback and speed reversal bookkeeping.
//!
//! Native players only offer a forward min/max bound and a signed speed. Backward
//! segments are synthesized as forward bounds plus an inverted speed, and the
//! inversion is tracked here rather than read back from the player.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::native::NativePlayer;

/// Ordered bounds for a `from -> to` request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentBounds<T> {
    pub lo: T,
    pub hi: T,
    /// The caller asked to play from the higher bound down to the lower one.
    pub needs_reverse: bool,
}

impl<T: PartialOrd + Copy> SegmentBounds<T> {
    pub fn plan(from: T, to: T) -> Self {
        let needs_reverse = from > to;
        let (lo, hi) = if needs_reverse { (to, from) } else { (from, to) };
        Self {
            lo,
            hi,
            needs_reverse,
        }
    }
}

/// The four states spanned by the two flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    ForwardFullRange,
    ForwardRestricted,
    ReversedFullRange,
    ReversedRestricted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentState {
    reversed: bool,
    frame_range_restricted: bool,
}

impl SegmentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the native speed sign is inverted relative to the element's speed.
    #[inline]
    pub fn reversed(&self) -> bool {
        self.reversed
    }

    /// True while the native frame range is narrower than the composition.
    #[inline]
    pub fn frame_range_restricted(&self) -> bool {
        self.frame_range_restricted
    }

    pub fn phase(&self) -> PlaybackPhase {
        match (self.reversed, self.frame_range_restricted) {
            (false, false) => PlaybackPhase::ForwardFullRange,
            (false, true) => PlaybackPhase::ForwardRestricted,
            (true, false) => PlaybackPhase::ReversedFullRange,
            (true, true) => PlaybackPhase::ReversedRestricted,
        }
    }

    /// Forget both flags without touching a player. Used when the player they
    /// described has been torn down.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Speed to hand the native player for an element speed, keeping any
    /// active inversion layered on top.
    #[inline]
    pub fn native_speed(&self, element_speed: f32) -> f32 {
        if self.reversed {
            -element_speed
        } else {
            element_speed
        }
    }

    pub fn restrict_frames<P: NativePlayer + ?Sized>(
        &mut self,
        native: &mut P,
        lo: i32,
        hi: i32,
    ) {
        native.set_frame_bounds(lo, hi);
        self.frame_range_restricted = true;
    }

    /// Put the frame bounds back to the full composition if a frame segment
    /// narrowed them.
    pub fn restore_frame_range<P: NativePlayer + ?Sized>(&mut self, native: &mut P) {
        if !self.frame_range_restricted {
            return;
        }
        if let Some(bounds) = native.composition_bounds() {
            native.set_frame_bounds(bounds.start_frame, bounds.end_frame);
        }
        self.frame_range_restricted = false;
    }

    /// Bring the native speed sign in line with `needs_reverse` using at most one
    /// `reverse_speed` call. Returns whether the sign was flipped.
    pub fn reconcile_direction<P: NativePlayer + ?Sized>(
        &mut self,
        native: &mut P,
        needs_reverse: bool,
    ) -> bool {
        if needs_reverse == self.reversed {
            return false;
        }
        native.reverse_speed();
        self.reversed = needs_reverse;
        debug!("segment: speed sign flipped, reversed={}", self.reversed);
        true
    }

    /// Return to forward, full-range playback. Runs before every plain play from
    /// the start.
    pub fn reset<P: NativePlayer + ?Sized>(&mut self, native: &mut P) {
        self.restore_frame_range(native);
        self.reconcile_direction(native, false);
    }
}
