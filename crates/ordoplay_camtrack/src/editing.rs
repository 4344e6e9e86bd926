// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing commands issued by a presentation layer.
//!
//! A UI pass pushes commands into an [`EditBatch`] while it walks the
//! keyframe and layer lists, and the session applies the batch once the walk
//! is over. Removals run last and from the highest index down, so no removal
//! shifts an index queued before it. Keyframe indices are additionally
//! resolved to [`KeyframeId`]s against the curve as it was before the batch,
//! because inserts and re-sorting moves also shift keyframe indices.

use crate::easing::EasingPreset;
use crate::history::MergeKey;
use crate::keyframe::{InterpolationMode, KeyframeId};
use crate::offset::Axis;

/// One editing operation
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Append an offset layer
    AddOffsetLayer {
        /// Initial offset
        offset: [f32; 3],
    },
    /// Overwrite one axis of an offset layer
    SetOffsetComponent {
        /// Layer index
        index: usize,
        /// Axis to write
        axis: Axis,
        /// New component value
        value: f32,
    },
    /// Remove an offset layer
    RemoveOffsetLayer {
        /// Layer index
        index: usize,
    },
    /// Add a key with value 0 at the playhead
    AddKeyframeAtPlayhead,
    /// Change a key's time and value
    MoveKeyframe {
        /// Key index
        index: usize,
        /// New time
        time: f32,
        /// New value
        value: f32,
    },
    /// Remove a key
    RemoveKeyframe {
        /// Key index
        index: usize,
    },
    /// Change the interpolation of the segment starting at a key
    SetInterpolation {
        /// Key index
        index: usize,
        /// New mode
        mode: InterpolationMode,
    },
    /// Replace the curve with a baked preset
    ApplyPreset {
        /// Preset to bake
        preset: EasingPreset,
        /// Number of keys to bake
        samples: usize,
    },
    /// Move the playhead
    Scrub {
        /// Target time
        time: f32,
    },
}

impl EditCommand {
    /// Get a description for history and logs
    pub fn description(&self) -> &'static str {
        match self {
            Self::AddOffsetLayer { .. } => "Add offset layer",
            Self::SetOffsetComponent { .. } => "Edit offset layer",
            Self::RemoveOffsetLayer { .. } => "Remove offset layer",
            Self::AddKeyframeAtPlayhead => "Add keyframe",
            Self::MoveKeyframe { .. } => "Move keyframe",
            Self::RemoveKeyframe { .. } => "Remove keyframe",
            Self::SetInterpolation { .. } => "Set interpolation",
            Self::ApplyPreset { .. } => "Apply easing preset",
            Self::Scrub { .. } => "Scrub",
        }
    }

    /// Whether the command changes the curve or offsets
    pub fn is_data_edit(&self) -> bool {
        !matches!(self, Self::Scrub { .. })
    }

    /// Whether the command removes an indexed item
    pub fn is_removal(&self) -> bool {
        matches!(self, Self::RemoveOffsetLayer { .. } | Self::RemoveKeyframe { .. })
    }

    /// Keyframe index the command addresses, if any
    pub fn keyframe_index(&self) -> Option<usize> {
        match self {
            Self::MoveKeyframe { index, .. } | Self::RemoveKeyframe { index } | Self::SetInterpolation { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }

    /// The same command aimed at another keyframe index
    pub(crate) fn with_keyframe_index(mut self, new_index: usize) -> Self {
        if let Self::MoveKeyframe { index, .. } | Self::RemoveKeyframe { index } | Self::SetInterpolation { index, .. } =
            &mut self
        {
            *index = new_index;
        }
        self
    }

    /// Merge key for collapsing repeated edits of the same target.
    ///
    /// Keyframe moves are keyed by id, which the caller resolves.
    pub(crate) fn merge_key(&self, keyframe: Option<KeyframeId>) -> Option<MergeKey> {
        match self {
            Self::SetOffsetComponent { index, axis, .. } => Some(MergeKey::OffsetComponent(*index, *axis)),
            Self::MoveKeyframe { .. } => keyframe.map(MergeKey::Keyframe),
            _ => None,
        }
    }
}

/// Result of a successfully applied command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Command created or moved an item, now at this index
    Index(usize),
    /// Command applied with nothing to report
    Applied,
    /// Command was valid but had no effect (scrub during playback)
    Ignored,
}

/// Commands gathered during one presentation pass
#[derive(Debug, Clone, Default)]
pub struct EditBatch {
    commands: Vec<EditCommand>,
    removals: Vec<EditCommand>,
}

impl EditBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command
    pub fn push(&mut self, command: EditCommand) {
        if command.is_removal() {
            self.removals.push(command);
        } else {
            self.commands.push(command);
        }
    }

    /// Whether nothing was queued
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.removals.is_empty()
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len() + self.removals.len()
    }

    /// Commands in application order.
    ///
    /// Non-removals keep their queue order. Removals follow, keyframes before
    /// layers, each from the highest index down, with duplicates dropped.
    pub fn into_ordered(self) -> Vec<EditCommand> {
        let mut removals = self.removals;
        removals.sort_by_key(|c| match c {
            EditCommand::RemoveKeyframe { index } => (0, std::cmp::Reverse(*index)),
            EditCommand::RemoveOffsetLayer { index } => (1, std::cmp::Reverse(*index)),
            _ => (2, std::cmp::Reverse(0)),
        });
        removals.dedup();

        let mut ordered = self.commands;
        ordered.extend(removals);
        ordered
    }
}

impl Extend<EditCommand> for EditBatch {
    fn extend<I: IntoIterator<Item = EditCommand>>(&mut self, iter: I) {
        for command in iter {
            self.push(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removals_run_last_highest_first() {
        let mut batch = EditBatch::new();
        batch.push(EditCommand::RemoveOffsetLayer { index: 0 });
        batch.push(EditCommand::SetOffsetComponent { index: 2, axis: Axis::X, value: 1.0 });
        batch.push(EditCommand::RemoveOffsetLayer { index: 2 });
        batch.push(EditCommand::RemoveKeyframe { index: 1 });
        batch.push(EditCommand::AddKeyframeAtPlayhead);
        assert_eq!(batch.len(), 5);

        let ordered = batch.into_ordered();
        assert_eq!(
            ordered,
            vec![
                EditCommand::SetOffsetComponent { index: 2, axis: Axis::X, value: 1.0 },
                EditCommand::AddKeyframeAtPlayhead,
                EditCommand::RemoveKeyframe { index: 1 },
                EditCommand::RemoveOffsetLayer { index: 2 },
                EditCommand::RemoveOffsetLayer { index: 0 },
            ]
        );
    }

    #[test]
    fn test_duplicate_removals_collapse() {
        let mut batch = EditBatch::new();
        batch.extend([
            EditCommand::RemoveKeyframe { index: 3 },
            EditCommand::RemoveKeyframe { index: 3 },
        ]);
        assert_eq!(batch.into_ordered(), vec![EditCommand::RemoveKeyframe { index: 3 }]);
    }

    #[test]
    fn test_classification() {
        assert!(!EditCommand::Scrub { time: 0.5 }.is_data_edit());
        assert!(EditCommand::AddKeyframeAtPlayhead.is_data_edit());
        assert!(EditCommand::RemoveKeyframe { index: 0 }.is_removal());
        assert_eq!(
            EditCommand::SetOffsetComponent { index: 1, axis: Axis::Z, value: 0.0 }.merge_key(None),
            Some(MergeKey::OffsetComponent(1, Axis::Z))
        );
        assert_eq!(EditCommand::MoveKeyframe { index: 0, time: 0.0, value: 0.0 }.merge_key(None), None);
    }

    #[test]
    fn test_keyframe_retargeting() {
        let remove = EditCommand::RemoveKeyframe { index: 2 };
        assert_eq!(remove.keyframe_index(), Some(2));
        assert_eq!(remove.with_keyframe_index(1), EditCommand::RemoveKeyframe { index: 1 });

        let set = EditCommand::SetInterpolation { index: 0, mode: InterpolationMode::Smooth };
        assert_eq!(
            set.with_keyframe_index(3),
            EditCommand::SetInterpolation { index: 3, mode: InterpolationMode::Smooth }
        );

        let layer = EditCommand::RemoveOffsetLayer { index: 2 };
        assert_eq!(layer.keyframe_index(), None);
        assert_eq!(layer.clone().with_keyframe_index(0), layer);
    }
}
