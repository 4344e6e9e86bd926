// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed-step playback run over a session.

use ordoplay_camtrack::{Axis, CameraSession, EditBatch, EditCommand, PlaybackState};

/// Simulated frame rate
pub const FRAME_RATE: f32 = 60.0;

/// Frames after which a run gives up
pub const MAX_FRAMES: u32 = 10_000;

/// Frames between pose log lines
const LOG_INTERVAL: u32 = 15;

/// Outcome of a preview run
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSummary {
    /// Frames ticked while playing
    pub frames: u32,
    /// Last pose written to the playback camera
    pub final_position: Option<[f32; 3]>,
    /// Edits the session refused
    pub rejected: usize,
}

/// Edit injected into the run at a given frame
#[derive(Debug, Clone)]
pub struct ScheduledEdit {
    /// Frame index the edit lands on
    pub frame: u32,
    /// Command to apply
    pub command: EditCommand,
}

/// The edits the default preview performs mid-playback
pub fn default_schedule() -> Vec<ScheduledEdit> {
    vec![
        ScheduledEdit {
            frame: LOG_INTERVAL * 2,
            command: EditCommand::SetOffsetComponent { index: 0, axis: Axis::X, value: 0.5 },
        },
        ScheduledEdit {
            frame: LOG_INTERVAL * 3,
            command: EditCommand::AddOffsetLayer { offset: [0.0, -1.0, 0.0] },
        },
    ]
}

/// Play the session from the start until it stops on its own
pub fn run(session: &mut CameraSession, schedule: &[ScheduledEdit]) -> PreviewSummary {
    let delta_time = 1.0 / FRAME_RATE;
    let mut summary = PreviewSummary {
        frames: 0,
        final_position: None,
        rejected: 0,
    };

    session.begin_playback();
    while session.state() == PlaybackState::Playing {
        if summary.frames >= MAX_FRAMES {
            tracing::warn!("Preview did not finish after {MAX_FRAMES} frames, stopping");
            session.end_playback();
            break;
        }

        let mut batch = EditBatch::new();
        batch.extend(
            schedule
                .iter()
                .filter(|edit| edit.frame == summary.frames)
                .map(|edit| edit.command.clone()),
        );

        let report = session.frame(delta_time, batch);
        summary.rejected += report.rejected.len();
        if let Some(pose) = report.pose {
            if summary.frames % LOG_INTERVAL == 0 {
                tracing::info!(
                    frame = summary.frames,
                    time = pose.time,
                    eased = pose.eased,
                    "Pose ({:.3}, {:.3}, {:.3})",
                    pose.position[0],
                    pose.position[1],
                    pose.position[2],
                );
            }
            summary.final_position = Some(pose.position);
        }
        summary.frames += 1;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageCamera;
    use ordoplay_camtrack::{CameraRig, TimelineSettings};

    fn session() -> CameraSession {
        let rig = CameraRig::new()
            .with_primary(StageCamera::new("main", [0.0, 1.0, 0.0], true))
            .with_playback(StageCamera::new("playback", [0.0; 3], false));
        let mut session = CameraSession::new(rig, TimelineSettings::default());
        session.add_offset_layer([0.0, 3.0, 1.0]);
        session
    }

    #[test]
    fn test_runs_to_completion() {
        let mut session = session();
        let summary = run(&mut session, &[]);

        assert_eq!(session.state(), PlaybackState::Idle);
        assert!(summary.frames >= 59 && summary.frames <= 61);
        assert_eq!(summary.final_position, Some([0.0, 4.0, 1.0]));
        assert_eq!(summary.rejected, 0);
    }

    #[test]
    fn test_scheduled_edits_apply_before_tick() {
        let mut session = session();
        let schedule = [ScheduledEdit {
            frame: 0,
            command: EditCommand::SetOffsetComponent { index: 0, axis: Axis::X, value: 2.0 },
        }];
        let summary = run(&mut session, &schedule);
        assert_eq!(summary.final_position, Some([2.0, 4.0, 1.0]));
    }

    #[test]
    fn test_counts_rejected_edits() {
        let mut session = session();
        let schedule = [ScheduledEdit {
            frame: 1,
            command: EditCommand::RemoveOffsetLayer { index: 7 },
        }];
        let summary = run(&mut session, &schedule);
        assert_eq!(summary.rejected, 1);
        assert_eq!(session.offsets().len(), 1);
    }

    #[test]
    fn test_default_schedule_targets_first_layer() {
        let mut session = session();
        let summary = run(&mut session, &default_schedule());
        assert_eq!(summary.rejected, 0);
        assert_eq!(session.offsets().len(), 2);
        assert_eq!(summary.final_position, Some([0.5, 3.0, 1.0]));
    }
}
