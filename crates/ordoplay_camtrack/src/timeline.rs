// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback state machine for the camera timeline.
//!
//! A session runs from `begin_playback` until normalized time reaches 1 or
//! `end_playback` is called. While idle the playhead can be scrubbed.

use crate::curve::{clamp01, KeyframeCurve};
use crate::offset::OffsetStack;
use crate::rig::CameraRig;
use crate::settings::TimelineSettings;
use serde::{Deserialize, Serialize};

/// Normalized time at which playback ends on its own
pub const END_TIME: f32 = 1.0;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not playing; the playhead can be scrubbed
    #[default]
    Idle,
    /// Advancing every tick
    Playing,
}

/// How the playback camera position is composed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PoseMode {
    /// `base + offset_sum`. The eased value is computed but does not move
    /// the camera; the curve only bounds the session length.
    #[default]
    OffsetSum,
    /// `base + offset_sum * eased`, so the curve shapes the motion
    EasedOffset,
}

impl PoseMode {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::OffsetSum => "Offset sum",
            Self::EasedOffset => "Eased offset",
        }
    }
}

/// Camera pose produced for one instant of the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Playback camera position
    pub position: [f32; 3],
    /// Curve value at the pose's time
    pub eased: f32,
    /// Timeline time the pose was computed for
    pub time: f32,
}

/// Compose a pose from a base position, the curve and the offsets
pub fn compose_pose(
    mode: PoseMode,
    base: [f32; 3],
    time: f32,
    curve: &KeyframeCurve,
    offsets: &OffsetStack,
) -> CameraPose {
    let eased = curve.evaluate(clamp01(time));
    let offset = offsets.sum();
    let weight = match mode {
        PoseMode::OffsetSum => 1.0,
        PoseMode::EasedOffset => eased,
    };

    CameraPose {
        position: [
            base[0] + offset[0] * weight,
            base[1] + offset[1] * weight,
            base[2] + offset[2] * weight,
        ],
        eased,
        time,
    }
}

/// Usable playback speed: non-finite falls back to 1, negative to 0.
///
/// A zero scale holds the playhead until playback is stopped.
pub fn sanitize_time_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.max(0.0)
    } else {
        1.0
    }
}

/// Owns the playhead and drives the rig while playing
#[derive(Debug, Clone)]
pub struct TimelineController {
    /// Current playback time
    current_time: f32,
    /// Playback state
    state: PlaybackState,
    /// Primary camera position captured at the start of the session
    base_position: [f32; 3],
    /// Multiplier applied to tick deltas
    pub time_scale: f32,
    /// Pose composition rule
    pub pose_mode: PoseMode,
    /// Whether scrubbing is honoured while playing
    pub scrub_during_playback: bool,
    /// Ticks since playback began
    frame_count: u64,
}

impl TimelineController {
    /// Create an idle controller configured from settings
    pub fn new(settings: &TimelineSettings) -> Self {
        Self {
            current_time: 0.0,
            state: PlaybackState::Idle,
            base_position: [0.0; 3],
            time_scale: sanitize_time_scale(settings.time_scale),
            pose_mode: settings.pose_mode,
            scrub_during_playback: settings.scrub_during_playback,
            frame_count: 0,
        }
    }

    /// Start (or restart) a playback session
    pub fn begin_playback(&mut self, rig: &mut CameraRig) {
        self.base_position = rig.capture_base();
        self.current_time = 0.0;
        self.frame_count = 0;
        self.state = PlaybackState::Playing;
        rig.activate();

        tracing::info!(base = ?self.base_position, "Camera playback started");
    }

    /// Advance the playhead and move the playback camera.
    ///
    /// Returns `None` while idle. The tick that reaches the end still
    /// writes its pose before playback ends.
    pub fn tick(
        &mut self,
        delta_time: f32,
        curve: &KeyframeCurve,
        offsets: &OffsetStack,
        rig: &mut CameraRig,
    ) -> Option<CameraPose> {
        if self.state != PlaybackState::Playing {
            return None;
        }

        // Time only moves forward during a session
        self.current_time += delta_time.max(0.0) * sanitize_time_scale(self.time_scale);
        self.frame_count += 1;

        let pose = self.pose(curve, offsets);
        rig.write_pose(pose.position);
        tracing::trace!(time = self.current_time, eased = pose.eased, "Camera timeline tick");

        if self.current_time >= END_TIME {
            self.end_playback(rig);
        }

        Some(pose)
    }

    /// Stop playback and restore the primary camera. Safe to repeat.
    pub fn end_playback(&mut self, rig: &mut CameraRig) {
        let was_playing = self.state == PlaybackState::Playing;
        self.state = PlaybackState::Idle;
        rig.deactivate();

        if was_playing {
            tracing::info!(time = self.current_time, frames = self.frame_count, "Camera playback ended");
        }
    }

    /// Move the playhead to `time` (clamped to [0, 1]).
    ///
    /// Ignored while playing unless `scrub_during_playback` is set.
    /// Returns whether the playhead moved.
    pub fn scrub(&mut self, time: f32) -> bool {
        if self.state == PlaybackState::Playing && !self.scrub_during_playback {
            tracing::debug!("Ignoring scrub during playback");
            return false;
        }

        self.current_time = clamp01(time);
        true
    }

    /// Pose at the current playhead using the captured base position
    pub fn pose(&self, curve: &KeyframeCurve, offsets: &OffsetStack) -> CameraPose {
        compose_pose(self.pose_mode, self.base_position, self.current_time, curve, offsets)
    }

    /// Current playback time
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Base position captured when playback began
    pub fn base_position(&self) -> [f32; 3] {
        self.base_position
    }

    /// Ticks since playback began
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Apply settings that can change mid-session
    pub fn apply_settings(&mut self, settings: &TimelineSettings) {
        self.time_scale = sanitize_time_scale(settings.time_scale);
        self.pose_mode = settings.pose_mode;
        self.scrub_during_playback = settings.scrub_during_playback;
    }
}

impl Default for TimelineController {
    fn default() -> Self {
        Self::new(&TimelineSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::probe::{ProbeAudio, ProbeCamera};

    struct Fixture {
        primary: ProbeCamera,
        playback: ProbeCamera,
        audio: ProbeAudio,
        rig: CameraRig,
    }

    fn fixture() -> Fixture {
        let primary = ProbeCamera::at([10.0, 0.0, -2.0], true);
        let playback = ProbeCamera::default();
        let audio = ProbeAudio::default();
        let rig = CameraRig::new()
            .with_primary(primary.clone())
            .with_playback(playback.clone())
            .with_audio(audio.clone());
        Fixture { primary, playback, audio, rig }
    }

    fn offsets() -> OffsetStack {
        let mut offsets = OffsetStack::new();
        offsets.add_layer([1.0, 0.0, 0.0]);
        offsets.add_layer([0.0, 2.0, 0.0]);
        offsets
    }

    #[test]
    fn test_begin_playback() {
        let mut f = fixture();
        let mut timeline = TimelineController::default();
        timeline.scrub(0.7);

        timeline.begin_playback(&mut f.rig);
        assert_eq!(timeline.state(), PlaybackState::Playing);
        assert_eq!(timeline.current_time(), 0.0);
        assert_eq!(timeline.base_position(), [10.0, 0.0, -2.0]);
        assert!(f.playback.state().enabled);
        assert!(!f.primary.state().enabled);
        assert!(f.audio.playing());
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut f = fixture();
        let mut timeline = TimelineController::default();
        let pose = timeline.tick(0.5, &KeyframeCurve::default(), &offsets(), &mut f.rig);
        assert!(pose.is_none());
        assert_eq!(timeline.current_time(), 0.0);
        assert_eq!(f.playback.state().writes, 0);
    }

    #[test]
    fn test_plays_to_completion() {
        let mut f = fixture();
        let curve = KeyframeCurve::default();
        let offsets = offsets();
        let mut timeline = TimelineController::default();
        timeline.begin_playback(&mut f.rig);

        let mut ticks = 0;
        while timeline.is_playing() {
            timeline.tick(0.25, &curve, &offsets, &mut f.rig);
            ticks += 1;
            assert!(ticks <= 4);
        }

        assert_eq!(ticks, 4);
        assert_eq!(timeline.state(), PlaybackState::Idle);
        assert!(!f.playback.state().enabled);
        assert!(f.primary.state().enabled);
        assert!(!f.audio.playing());
        assert_eq!(f.playback.state().writes, 4);
    }

    #[test]
    fn test_offset_sum_pose_ignores_curve() {
        let mut f = fixture();
        let offsets = offsets();
        let mut timeline = TimelineController::default();
        timeline.begin_playback(&mut f.rig);

        let pose = timeline.tick(0.1, &KeyframeCurve::default(), &offsets, &mut f.rig).unwrap();
        assert_eq!(pose.position, [11.0, 2.0, -2.0]);
        assert!((pose.eased - 0.1).abs() < 1e-6);
        assert_eq!(f.playback.state().position, [11.0, 2.0, -2.0]);

        // Primary camera moving mid-session does not change the base
        f.primary.0.borrow_mut().position = [0.0; 3];
        let pose = timeline.tick(0.1, &KeyframeCurve::empty(), &offsets, &mut f.rig).unwrap();
        assert_eq!(pose.position, [11.0, 2.0, -2.0]);
    }

    #[test]
    fn test_eased_offset_pose() {
        let mut f = fixture();
        let settings = TimelineSettings {
            pose_mode: PoseMode::EasedOffset,
            ..TimelineSettings::default()
        };
        let mut timeline = TimelineController::new(&settings);
        timeline.begin_playback(&mut f.rig);

        let pose = timeline.tick(0.5, &KeyframeCurve::default(), &offsets(), &mut f.rig).unwrap();
        assert!((pose.position[0] - 10.5).abs() < 1e-6);
        assert!((pose.position[1] - 1.0).abs() < 1e-6);
        assert_eq!(pose.position[2], -2.0);
    }

    #[test]
    fn test_time_scale() {
        let mut f = fixture();
        let settings = TimelineSettings { time_scale: 0.5, ..TimelineSettings::default() };
        let mut timeline = TimelineController::new(&settings);
        timeline.begin_playback(&mut f.rig);
        timeline.tick(1.0, &KeyframeCurve::default(), &offsets(), &mut f.rig);
        assert_eq!(timeline.current_time(), 0.5);
        assert!(timeline.is_playing());
    }

    #[test]
    fn test_time_scale_sanitized() {
        assert_eq!(sanitize_time_scale(2.0), 2.0);
        assert_eq!(sanitize_time_scale(-1.0), 0.0);
        assert_eq!(sanitize_time_scale(f32::NAN), 1.0);
        assert_eq!(sanitize_time_scale(f32::INFINITY), 1.0);
    }

    #[test]
    fn test_negative_time_scale_does_not_rewind() {
        let mut f = fixture();
        let settings = TimelineSettings { time_scale: -1.0, ..TimelineSettings::default() };
        let mut timeline = TimelineController::new(&settings);
        timeline.begin_playback(&mut f.rig);
        timeline.tick(0.1, &KeyframeCurve::default(), &offsets(), &mut f.rig);
        timeline.tick(0.1, &KeyframeCurve::default(), &offsets(), &mut f.rig);
        assert_eq!(timeline.current_time(), 0.0);

        // Writing the public field directly is sanitized on tick as well
        timeline.time_scale = -3.0;
        timeline.tick(0.1, &KeyframeCurve::default(), &offsets(), &mut f.rig);
        assert_eq!(timeline.current_time(), 0.0);
    }

    #[test]
    fn test_nan_time_scale_still_finishes() {
        let mut f = fixture();
        let settings = TimelineSettings { time_scale: f32::NAN, ..TimelineSettings::default() };
        let mut timeline = TimelineController::new(&settings);
        timeline.begin_playback(&mut f.rig);
        for _ in 0..4 {
            timeline.tick(0.25, &KeyframeCurve::default(), &offsets(), &mut f.rig);
        }
        assert_eq!(timeline.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_negative_delta_does_not_rewind() {
        let mut f = fixture();
        let mut timeline = TimelineController::default();
        timeline.begin_playback(&mut f.rig);
        timeline.tick(0.3, &KeyframeCurve::default(), &offsets(), &mut f.rig);
        timeline.tick(-0.2, &KeyframeCurve::default(), &offsets(), &mut f.rig);
        assert!((timeline.current_time() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_scrub_only_while_idle() {
        let mut f = fixture();
        let mut timeline = TimelineController::default();

        assert!(timeline.scrub(0.5));
        assert_eq!(timeline.current_time(), 0.5);
        assert!(timeline.scrub(3.0));
        assert_eq!(timeline.current_time(), 1.0);

        timeline.begin_playback(&mut f.rig);
        assert!(!timeline.scrub(0.5));
        assert_eq!(timeline.current_time(), 0.0);
        assert!(timeline.is_playing());
    }

    #[test]
    fn test_scrub_during_playback_when_enabled() {
        let mut f = fixture();
        let settings = TimelineSettings { scrub_during_playback: true, ..TimelineSettings::default() };
        let mut timeline = TimelineController::new(&settings);
        timeline.begin_playback(&mut f.rig);
        assert!(timeline.scrub(0.5));
        assert_eq!(timeline.current_time(), 0.5);
        assert!(timeline.is_playing());
    }

    #[test]
    fn test_end_playback_is_idempotent() {
        let mut f = fixture();
        let mut timeline = TimelineController::default();
        timeline.begin_playback(&mut f.rig);
        timeline.tick(0.2, &KeyframeCurve::default(), &offsets(), &mut f.rig);

        timeline.end_playback(&mut f.rig);
        let once = (timeline.state(), timeline.current_time(), f.primary.state(), f.playback.state(), f.audio.playing());
        timeline.end_playback(&mut f.rig);
        let twice = (timeline.state(), timeline.current_time(), f.primary.state(), f.playback.state(), f.audio.playing());
        assert_eq!(once, twice);
        assert_eq!(timeline.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_playback_without_handles() {
        let mut rig = CameraRig::new();
        let mut timeline = TimelineController::default();
        timeline.begin_playback(&mut rig);
        assert_eq!(timeline.base_position(), [0.0; 3]);
        let pose = timeline.tick(1.5, &KeyframeCurve::default(), &offsets(), &mut rig).unwrap();
        assert_eq!(pose.position, [1.0, 2.0, 0.0]);
        assert!(!timeline.is_playing());
    }
}
