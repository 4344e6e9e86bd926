// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera animation timeline for OrdoPlay.
//!
//! This crate drives a camera along a normalized timeline:
//! - Keyframe easing curve with linear and smooth segments
//! - Additive offset layers
//! - Playback controller with camera/audio handoff
//! - Editing commands with deferred removals and undo/redo
//! - egui timeline panel
//!
//! ## Architecture
//!
//! All state lives in a [`CameraSession`] owned by the caller. A frame applies
//! queued [`EditCommand`]s first and then advances the [`TimelineController`],
//! which writes the composed pose to the playback camera.

pub mod curve;
pub mod easing;
pub mod editing;
pub mod error;
pub mod history;
pub mod keyframe;
pub mod offset;
pub mod rig;
pub mod session;
pub mod settings;
pub mod timeline;
pub mod ui;

pub use curve::{clamp01, KeyframeCurve};
pub use easing::{EasingPreset, ElasticParams};
pub use editing::{EditBatch, EditCommand, EditOutcome};
pub use error::{EditError, IndexTarget};
pub use history::{EditHistory, HistoryError, MergeKey, Snapshot};
pub use keyframe::{Interpolation, InterpolationMode, Keyframe, KeyframeId};
pub use offset::{Axis, OffsetLayer, OffsetStack};
pub use rig::{AudioHandle, CameraHandle, CameraRig};
pub use session::{CameraSession, FrameReport};
pub use settings::{SettingsError, TimelineSettings};
pub use timeline::{
    compose_pose, sanitize_time_scale, CameraPose, PlaybackState, PoseMode, TimelineController, END_TIME,
};
pub use ui::TimelinePanel;
