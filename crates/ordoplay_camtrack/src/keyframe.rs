// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for the easing curve.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a curve key that survives re-sorting moves.
///
/// Indices shift whenever a key crosses a neighbour or one is inserted
/// before it; the id does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Mint an id for a freshly created key
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::generate()
    }
}

/// Interpolation mode from a keyframe to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Linear interpolation
    #[default]
    Linear,
    /// Cubic Hermite with monotonicity-preserving tangents
    Smooth,
}

impl InterpolationMode {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Smooth => "Smooth",
        }
    }

    /// The other mode, for toggle buttons
    pub fn toggled(self) -> Self {
        match self {
            Self::Linear => Self::Smooth,
            Self::Smooth => Self::Linear,
        }
    }
}

/// A control point of the easing curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Normalized time, nominally in [0, 1]
    pub time: f32,
    /// Curve value at this keyframe
    pub value: f32,
    /// Interpolation mode to next keyframe
    pub interpolation: InterpolationMode,
}

impl Keyframe {
    /// Create a new linear keyframe
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            id: KeyframeId::generate(),
            time,
            value,
            interpolation: InterpolationMode::Linear,
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }
}

/// Segment kernels used by [`crate::curve::KeyframeCurve::evaluate`]
pub struct Interpolation;

impl Interpolation {
    /// Blend two key values by the segment fraction `u`
    pub fn lerp(from: f32, to: f32, u: f32) -> f32 {
        from + (to - from) * u
    }

    /// Cubic Hermite segment between two key values.
    ///
    /// Slopes are per unit of `u`, i.e. already multiplied by the segment's
    /// time span.
    pub fn hermite(from: f32, from_slope: f32, to: f32, to_slope: f32, u: f32) -> f32 {
        let u2 = u * u;
        let u3 = u2 * u;

        let start_weight = 2.0 * u3 - 3.0 * u2 + 1.0;
        let start_slope_weight = u3 - 2.0 * u2 + u;
        let end_weight = 3.0 * u2 - 2.0 * u3;
        let end_slope_weight = u3 - u2;

        start_weight * from + start_slope_weight * from_slope + end_weight * to + end_slope_weight * to_slope
    }

    /// Tangent for an interior key given the slopes of its two segments.
    ///
    /// Harmonic mean of the secants, zero at local extrema. Keeps each
    /// Hermite segment inside the Fritsch-Carlson monotonicity region.
    pub fn monotone_tangent(d0: f32, d1: f32) -> f32 {
        if d0 * d1 <= 0.0 {
            0.0
        } else {
            2.0 * d0 * d1 / (d0 + d1)
        }
    }
}
