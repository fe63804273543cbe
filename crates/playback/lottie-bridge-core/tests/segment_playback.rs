mod common;

use common::{attached, attached_with, calls, clear, count, player, NativeCall};
use lottie_bridge_core::{AdapterConfig, AdapterEvent, NativePlayer, PlayKind, PlaybackPhase};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// it should play a backward frame segment as forward bounds plus an inverted speed
#[test]
fn backward_frame_segment_restricts_and_reverses() {
    let (mut adapter, mut el, log) = attached("bounce");

    el.play_segment_by_frame(80, 20);
    adapter.process(&mut el);

    assert_eq!(
        calls(&log),
        vec![
            NativeCall::SetFrameBounds(20, 80),
            NativeCall::ReverseSpeed,
            NativeCall::Play,
        ]
    );
    assert!(adapter.reversed());
    assert!(adapter.frame_range_restricted());
    assert_eq!(adapter.segment_state().phase(), PlaybackPhase::ReversedRestricted);
    assert!(el.is_playing());

    let native = player(&adapter).inner();
    assert_eq!(native.frame_bounds(), (20.0, 80.0));
    assert_eq!(native.speed(), -1.0);
    assert_eq!(native.frame(), 80.0);
}

/// it should restore the full range and forward speed on the next plain play
#[test]
fn plain_play_after_reversed_segment_resets_everything() {
    let (mut adapter, mut el, log) = attached("bounce");
    el.play_segment_by_frame(80, 20);
    adapter.process(&mut el);
    clear(&log);

    el.play();
    adapter.process(&mut el);

    assert_eq!(
        calls(&log),
        vec![
            NativeCall::SetFrameBounds(0, 100),
            NativeCall::ReverseSpeed,
            NativeCall::Play,
        ]
    );
    assert!(!adapter.reversed());
    assert!(!adapter.frame_range_restricted());
    assert!(el.is_playing());

    let native = player(&adapter).inner();
    assert_eq!(native.frame_bounds(), (0.0, 100.0));
    assert_eq!(native.speed(), 1.0);
    assert_eq!(native.frame(), 0.0);
}

/// it should keep ascending progress segments forward with exact bounds
#[test]
fn ascending_progress_segments_stay_forward() {
    for (from, to) in [(0.0f32, 1.0f32), (0.25, 0.75), (0.5, 0.5), (0.1, 0.2)] {
        let (mut adapter, mut el, log) = attached("bounce");
        el.play_segment_by_progress(from, to);
        adapter.process(&mut el);

        assert!(!adapter.reversed(), "({from}, {to})");
        assert_eq!(count(&log, &NativeCall::ReverseSpeed), 0);
        assert!(calls(&log).contains(&NativeCall::SetProgressBounds(from, to)));
        let (lo, hi) = player(&adapter).inner().frame_bounds();
        approx(lo, from * 100.0, 1e-3);
        approx(hi, to * 100.0, 1e-3);
    }
}

/// it should order descending progress segments and flip the speed
#[test]
fn descending_progress_segments_reverse() {
    for (from, to) in [(1.0f32, 0.0f32), (0.75, 0.25), (0.3, 0.2)] {
        let (mut adapter, mut el, log) = attached("bounce");
        el.play_segment_by_progress(from, to);
        adapter.process(&mut el);

        assert!(adapter.reversed(), "({from}, {to})");
        assert!(calls(&log).contains(&NativeCall::SetProgressBounds(to, from)));
        assert_eq!(count(&log, &NativeCall::ReverseSpeed), 1);
        assert!(player(&adapter).inner().speed() < 0.0);
    }
}

/// it should not re-toggle the speed for repeated same-direction segments
#[test]
fn same_direction_segments_flip_speed_once() {
    let (mut adapter, mut el, log) = attached("bounce");

    el.play_segment_by_progress(0.9, 0.1);
    el.play_segment_by_frame(60, 30);
    el.play_segment_by_progress(0.5, 0.4);
    adapter.process(&mut el);
    assert_eq!(count(&log, &NativeCall::ReverseSpeed), 1);
    assert_eq!(player(&adapter).inner().speed(), -1.0);

    clear(&log);
    el.play_segment_by_frame(10, 90);
    el.play_segment_by_progress(0.0, 0.3);
    adapter.process(&mut el);
    assert_eq!(count(&log, &NativeCall::ReverseSpeed), 1);
    assert!(!adapter.reversed());
    assert_eq!(player(&adapter).inner().speed(), 1.0);
}

/// it should put the frame range back before applying progress bounds
#[test]
fn progress_segment_clears_frame_restriction() {
    let (mut adapter, mut el, log) = attached("bounce");
    el.play_segment_by_frame(80, 20);
    adapter.process(&mut el);
    clear(&log);

    el.play_segment_by_progress(0.6, 0.2);
    adapter.process(&mut el);

    assert_eq!(
        calls(&log),
        vec![
            NativeCall::SetFrameBounds(0, 100),
            NativeCall::SetProgressBounds(0.2, 0.6),
            NativeCall::Play,
        ]
    );
    assert!(!adapter.frame_range_restricted());
    assert!(adapter.reversed());
    assert_eq!(adapter.segment_state().phase(), PlaybackPhase::ReversedFullRange);
}

/// it should leave the restriction alone when configured to
#[test]
fn progress_segment_keeps_restriction_when_disabled() {
    let cfg = AdapterConfig {
        clear_frame_range_on_progress_segment: false,
        ..AdapterConfig::default()
    };
    let (mut adapter, mut el, log) = attached_with("bounce", cfg);
    el.play_segment_by_frame(20, 80);
    adapter.process(&mut el);
    clear(&log);

    el.play_segment_by_progress(0.3, 0.4);
    adapter.process(&mut el);

    assert_eq!(count(&log, &NativeCall::SetFrameBounds(0, 100)), 0);
    assert!(adapter.frame_range_restricted());
    assert_eq!(adapter.segment_state().phase(), PlaybackPhase::ForwardRestricted);
}

/// it should clamp progress bounds into [0, 1] and ignore NaN requests
#[test]
fn progress_segment_input_sanitising() {
    let (mut adapter, mut el, log) = attached("bounce");

    el.play_segment_by_progress(-0.5, 1.5);
    adapter.process(&mut el);
    assert!(calls(&log).contains(&NativeCall::SetProgressBounds(0.0, 1.0)));

    clear(&log);
    el.pause();
    el.play_segment_by_progress(f32::NAN, 0.5);
    adapter.process(&mut el);
    assert_eq!(calls(&log), vec![NativeCall::Pause]);
    assert!(!el.is_playing());
}

/// it should resume a paused full-range play instead of restarting it
#[test]
fn play_after_pause_resumes() {
    let (mut adapter, mut el, log) = attached("bounce");
    el.play();
    adapter.process(&mut el);
    adapter
        .native_mut()
        .unwrap()
        .tick(std::time::Duration::from_secs(1));
    el.pause();
    adapter.process(&mut el);
    assert!(!el.is_playing());
    clear(&log);

    el.play();
    adapter.process(&mut el);

    assert_eq!(calls(&log), vec![NativeCall::Resume]);
    assert!(el.is_playing());
    approx(player(&adapter).progress(), 0.25, 1e-4);
    let started: Vec<_> = adapter
        .take_outputs()
        .events
        .into_iter()
        .filter_map(|e| match e {
            AdapterEvent::PlaybackStarted { kind, .. } => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![PlayKind::Restart, PlayKind::Resume]);
}

/// it should resume a paused forward progress segment inside its bounds
#[test]
fn play_after_paused_progress_segment_resumes() {
    let (mut adapter, mut el, log) = attached("bounce");
    el.play_segment_by_progress(0.2, 0.4);
    adapter.process(&mut el);
    el.pause();
    adapter.process(&mut el);
    clear(&log);

    el.play();
    adapter.process(&mut el);

    // Progress bounds set no flag, so nothing forces the full-range reset.
    assert_eq!(calls(&log), vec![NativeCall::Resume]);
    let (lo, hi) = player(&adapter).inner().frame_bounds();
    approx(lo, 20.0, 1e-3);
    approx(hi, 40.0, 1e-3);
}

/// it should keep the element speed layered under an active reversal
#[test]
fn speed_change_while_reversed_keeps_inversion() {
    let (mut adapter, mut el, log) = attached("bounce");
    el.play_segment_by_frame(90, 10);
    el.set_speed(2.0);
    adapter.process(&mut el);
    assert!(calls(&log).contains(&NativeCall::SetSpeed(-2.0)));
    assert_eq!(player(&adapter).inner().speed(), -2.0);

    el.play();
    adapter.process(&mut el);
    assert_eq!(player(&adapter).inner().speed(), 2.0);
    assert!(!adapter.reversed());
}
