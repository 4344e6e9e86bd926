// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised by the editing operations.

use std::fmt;
use thiserror::Error;

/// Which indexed collection an edit addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTarget {
    /// A keyframe in the easing curve
    Keyframe,
    /// A layer in the offset stack
    OffsetLayer,
}

impl fmt::Display for IndexTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyframe => f.write_str("keyframe"),
            Self::OffsetLayer => f.write_str("offset layer"),
        }
    }
}

/// Edit errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The index does not name an existing keyframe or layer
    #[error("{target} index {index} out of range (len {len})")]
    OutOfRangeIndex {
        /// Collection the index was meant for
        target: IndexTarget,
        /// The rejected index
        index: usize,
        /// Collection length at the time of the call
        len: usize,
    },
}

impl EditError {
    /// Check `index` against `len`, producing an `OutOfRangeIndex` on failure
    pub(crate) fn check(target: IndexTarget, index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::OutOfRangeIndex { target, index, len })
        }
    }
}

/// Result type for editing operations
pub type Result<T> = std::result::Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_bounds() {
        assert!(EditError::check(IndexTarget::Keyframe, 1, 2).is_ok());
        assert_eq!(
            EditError::check(IndexTarget::OffsetLayer, 2, 2),
            Err(EditError::OutOfRangeIndex { target: IndexTarget::OffsetLayer, index: 2, len: 2 })
        );
    }

    #[test]
    fn test_message() {
        let err = EditError::OutOfRangeIndex { target: IndexTarget::Keyframe, index: 4, len: 3 };
        assert_eq!(err.to_string(), "keyframe index 4 out of range (len 3)");
    }
}
