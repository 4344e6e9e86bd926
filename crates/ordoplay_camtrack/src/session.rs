// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera timeline session.
//!
//! The session owns the curve, the offsets, the timeline controller and the
//! injected rig. Hosts call [`CameraSession::frame`] once per frame: queued
//! edits are applied first, then the timeline ticks, so an edit is visible
//! in the pose of the frame it was made in.

use crate::curve::{clamp01, KeyframeCurve};
use crate::easing::EasingPreset;
use crate::editing::{EditBatch, EditCommand, EditOutcome};
use crate::error::{EditError, IndexTarget, Result};
use crate::history::{EditHistory, HistoryError, Snapshot};
use crate::keyframe::{InterpolationMode, KeyframeId};
use crate::offset::{Axis, OffsetStack};
use crate::rig::CameraRig;
use crate::settings::TimelineSettings;
use crate::timeline::{CameraPose, PlaybackState, TimelineController};

/// What happened during one [`CameraSession::frame`]
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Pose written this frame, if playing
    pub pose: Option<CameraPose>,
    /// Edits that were rejected
    pub rejected: Vec<(EditCommand, EditError)>,
}

/// One camera timeline with its editable data and host handles
#[derive(Debug)]
pub struct CameraSession {
    curve: KeyframeCurve,
    offsets: OffsetStack,
    timeline: TimelineController,
    rig: CameraRig,
    settings: TimelineSettings,
    history: EditHistory,
}

impl CameraSession {
    /// Create a session with the default linear curve and no offsets
    pub fn new(rig: CameraRig, settings: TimelineSettings) -> Self {
        Self {
            curve: KeyframeCurve::linear(),
            offsets: OffsetStack::new(),
            timeline: TimelineController::new(&settings),
            history: EditHistory::new(settings.history_depth),
            rig,
            settings,
        }
    }

    /// Replace the editable data wholesale, clearing history
    pub fn with_data(mut self, curve: KeyframeCurve, offsets: OffsetStack) -> Self {
        self.curve = curve;
        self.offsets = offsets;
        self.history.clear();
        self
    }

    /// The easing curve
    pub fn curve(&self) -> &KeyframeCurve {
        &self.curve
    }

    /// The offset layers
    pub fn offsets(&self) -> &OffsetStack {
        &self.offsets
    }

    /// The playback controller
    pub fn timeline(&self) -> &TimelineController {
        &self.timeline
    }

    /// The host handles
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Active settings
    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    /// Edit history
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Swap settings; playback tunables take effect on the next tick
    pub fn set_settings(&mut self, settings: TimelineSettings) {
        self.timeline.apply_settings(&settings);
        self.settings = settings;
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    /// Start playback from time 0
    pub fn begin_playback(&mut self) {
        self.history.seal();
        self.timeline.begin_playback(&mut self.rig);
    }

    /// Stop playback and restore the primary camera
    pub fn end_playback(&mut self) {
        self.timeline.end_playback(&mut self.rig);
    }

    /// Advance playback by `delta_time`
    pub fn tick(&mut self, delta_time: f32) -> Option<CameraPose> {
        self.timeline.tick(delta_time, &self.curve, &self.offsets, &mut self.rig)
    }

    /// Apply a frame's edits, then tick
    pub fn frame(&mut self, delta_time: f32, edits: EditBatch) -> FrameReport {
        let rejected = self.apply_batch(edits);
        let pose = self.tick(delta_time);
        FrameReport { pose, rejected }
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.timeline.state()
    }

    /// Pose at the playhead, for previews while idle
    pub fn preview_pose(&self) -> CameraPose {
        self.timeline.pose(&self.curve, &self.offsets)
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Apply one command. A failed command changes nothing.
    pub fn apply(&mut self, command: EditCommand) -> Result<EditOutcome> {
        let outcome = match command {
            EditCommand::AddOffsetLayer { offset } => EditOutcome::Index(self.add_offset_layer(offset)),
            EditCommand::SetOffsetComponent { index, axis, value } => {
                self.set_offset_component(index, axis, value)?;
                EditOutcome::Applied
            }
            EditCommand::RemoveOffsetLayer { index } => {
                self.remove_offset_layer(index)?;
                EditOutcome::Applied
            }
            EditCommand::AddKeyframeAtPlayhead => EditOutcome::Index(self.add_keyframe_at_playhead()),
            EditCommand::MoveKeyframe { index, time, value } => {
                EditOutcome::Index(self.move_keyframe(index, time, value)?)
            }
            EditCommand::RemoveKeyframe { index } => {
                self.remove_keyframe(index)?;
                EditOutcome::Applied
            }
            EditCommand::SetInterpolation { index, mode } => {
                self.set_interpolation(index, mode)?;
                EditOutcome::Applied
            }
            EditCommand::ApplyPreset { preset, samples } => {
                self.apply_preset(preset, samples);
                EditOutcome::Applied
            }
            EditCommand::Scrub { time } => {
                if self.scrub(time) {
                    EditOutcome::Applied
                } else {
                    EditOutcome::Ignored
                }
            }
        };
        Ok(outcome)
    }

    /// Apply a batch in order; returns the rejected commands.
    ///
    /// Keyframe commands act on the key their index named before the batch
    /// started, wherever earlier commands in the batch have moved it.
    pub fn apply_batch(&mut self, batch: EditBatch) -> Vec<(EditCommand, EditError)> {
        let targeted: Vec<(EditCommand, Option<KeyframeId>)> = batch
            .into_ordered()
            .into_iter()
            .map(|command| {
                let target = command.keyframe_index().and_then(|index| self.curve.key(index)).map(|k| k.id);
                (command, target)
            })
            .collect();

        let mut rejected = Vec::new();
        for (command, target) in targeted {
            if let Err(err) = self.apply_to_keyframe(command.clone(), target) {
                tracing::warn!("Rejected edit {:?}: {}", command, err);
                rejected.push((command, err));
            }
        }
        rejected
    }

    /// Apply `command` with its keyframe index re-resolved from `target`
    fn apply_to_keyframe(&mut self, command: EditCommand, target: Option<KeyframeId>) -> Result<EditOutcome> {
        let Some(id) = target else {
            return self.apply(command);
        };
        match self.curve.index_of(id) {
            Some(index) => self.apply(command.with_keyframe_index(index)),
            // Removed or replaced earlier in the batch
            None => Err(EditError::OutOfRangeIndex {
                target: IndexTarget::Keyframe,
                index: command.keyframe_index().unwrap_or_default(),
                len: self.curve.len(),
            }),
        }
    }

    /// Push a history entry for a command that has just succeeded
    fn record(&mut self, command: &EditCommand, before: Snapshot, keyframe: Option<KeyframeId>) {
        tracing::debug!(?command, "{}", command.description());
        self.history.record(command.description(), before, command.merge_key(keyframe));
    }

    /// Append an offset layer; returns its index
    pub fn add_offset_layer(&mut self, offset: [f32; 3]) -> usize {
        let before = self.snapshot();
        let index = self.offsets.add_layer(offset);
        self.record(&EditCommand::AddOffsetLayer { offset }, before, None);
        index
    }

    /// Overwrite one axis of an offset layer
    pub fn set_offset_component(&mut self, index: usize, axis: Axis, value: f32) -> Result<()> {
        let before = self.snapshot();
        self.offsets.set_layer_component(index, axis, value)?;
        self.record(&EditCommand::SetOffsetComponent { index, axis, value }, before, None);
        Ok(())
    }

    /// Remove an offset layer; later layers shift down by one index
    pub fn remove_offset_layer(&mut self, index: usize) -> Result<()> {
        let before = self.snapshot();
        self.offsets.remove_layer(index)?;
        self.record(&EditCommand::RemoveOffsetLayer { index }, before, None);
        Ok(())
    }

    /// Add a zero-valued key at the playhead; returns its index
    pub fn add_keyframe_at_playhead(&mut self) -> usize {
        let before = self.snapshot();
        let index = self.curve.add_key(clamp01(self.timeline.current_time()), 0.0);
        self.record(&EditCommand::AddKeyframeAtPlayhead, before, None);
        index
    }

    /// Change a key's time and value; returns its index after re-sorting
    pub fn move_keyframe(&mut self, index: usize, time: f32, value: f32) -> Result<usize> {
        let before = self.snapshot();
        let keyframe = self.curve.key(index).map(|k| k.id);
        let new_index = self.curve.move_key(index, time, value)?;
        self.record(&EditCommand::MoveKeyframe { index, time, value }, before, keyframe);
        Ok(new_index)
    }

    /// Remove a key
    pub fn remove_keyframe(&mut self, index: usize) -> Result<()> {
        let before = self.snapshot();
        self.curve.remove_key(index)?;
        self.record(&EditCommand::RemoveKeyframe { index }, before, None);
        Ok(())
    }

    /// Set the interpolation of the segment starting at a key
    pub fn set_interpolation(&mut self, index: usize, mode: InterpolationMode) -> Result<()> {
        let before = self.snapshot();
        self.curve.set_interpolation(index, mode)?;
        self.record(&EditCommand::SetInterpolation { index, mode }, before, None);
        Ok(())
    }

    /// Replace the curve with a baked preset
    pub fn apply_preset(&mut self, preset: EasingPreset, samples: usize) {
        let before = self.snapshot();
        self.curve = KeyframeCurve::from_preset(preset, samples);
        self.record(&EditCommand::ApplyPreset { preset, samples }, before, None);
    }

    /// Move the playhead; returns whether it moved. Not recorded in history.
    pub fn scrub(&mut self, time: f32) -> bool {
        self.timeline.scrub(time)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            curve: self.curve.clone(),
            offsets: self.offsets.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.curve = snapshot.curve;
        self.offsets = snapshot.offsets;
    }

    /// Revert the last edit
    pub fn undo(&mut self) -> std::result::Result<(), HistoryError> {
        let restored = self.history.undo(self.snapshot())?;
        self.restore(restored);
        Ok(())
    }

    /// Reapply the last undone edit
    pub fn redo(&mut self) -> std::result::Result<(), HistoryError> {
        let restored = self.history.redo(self.snapshot())?;
        self.restore(restored);
        Ok(())
    }

    /// End the current merge run (e.g. when a drag is released)
    pub fn seal_history(&mut self) {
        self.history.seal();
    }
}
