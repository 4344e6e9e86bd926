// SPDX-License-Identifier: MIT OR Apache-2.0
//! Piecewise easing curve built from keyframes.
//!
//! Keys are kept sorted by ascending time after every mutation. Keys sharing
//! a time keep their insertion order, and evaluation at such a time resolves
//! to the last of them.

use crate::easing::EasingPreset;
use crate::error::{EditError, IndexTarget, Result};
use crate::keyframe::{Interpolation, InterpolationMode, Keyframe, KeyframeId};
use serde::{Deserialize, Serialize};

/// Segments shorter than this evaluate to their end key
const MIN_SPAN: f32 = 1e-6;

/// Clamp a query time to [0, 1], mapping NaN to 0
pub fn clamp01(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

/// Easing curve over normalized time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeCurve {
    keys: Vec<Keyframe>,
}

impl KeyframeCurve {
    /// Create a curve with no keyframes (evaluates to 0 everywhere)
    pub fn empty() -> Self {
        Self { keys: Vec::new() }
    }

    /// Create the two-point identity curve (0,0) -> (1,1)
    pub fn linear() -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)],
        }
    }

    /// Build a curve from arbitrary keys, sorting them by time
    pub fn from_keys(keys: impl IntoIterator<Item = Keyframe>) -> Self {
        let mut curve = Self::empty();
        for key in keys {
            curve.insert_sorted(key);
        }
        curve
    }

    /// Bake an easing preset into `samples` evenly spaced smooth keys
    pub fn from_preset(preset: EasingPreset, samples: usize) -> Self {
        let samples = samples.max(2);
        let last = (samples - 1) as f32;
        let keys = (0..samples).map(|i| {
            let t = i as f32 / last;
            Keyframe::new(t, preset.apply(t)).with_interpolation(InterpolationMode::Smooth)
        });
        Self { keys: keys.collect() }
    }

    /// Evaluate the curve at `t` (clamped to [0, 1])
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = clamp01(t);

        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; always in 1..len here
        let next = self.keys.partition_point(|k| k.time <= t);
        let a = &self.keys[next - 1];
        let b = &self.keys[next];

        let span = b.time - a.time;
        if span < MIN_SPAN {
            return b.value;
        }
        let u = (t - a.time) / span;

        match a.interpolation {
            InterpolationMode::Linear => Interpolation::lerp(a.value, b.value, u),
            InterpolationMode::Smooth => {
                let m0 = self.tangent(next - 1) * span;
                let m1 = self.tangent(next) * span;
                Interpolation::hermite(a.value, m0, b.value, m1, u)
            }
        }
    }

    /// Slope of the segment starting at `index`
    fn secant(&self, index: usize) -> f32 {
        let a = &self.keys[index];
        let b = &self.keys[index + 1];
        let span = b.time - a.time;
        if span < MIN_SPAN {
            0.0
        } else {
            (b.value - a.value) / span
        }
    }

    /// Tangent at key `index` for smooth segments
    fn tangent(&self, index: usize) -> f32 {
        let last = self.keys.len() - 1;
        if index == 0 {
            self.secant(0)
        } else if index == last {
            self.secant(last - 1)
        } else {
            Interpolation::monotone_tangent(self.secant(index - 1), self.secant(index))
        }
    }

    /// Insert a key after any keys with a time <= its own; returns its index.
    ///
    /// Non-finite times are pulled into [0, 1] first so the ordering holds.
    fn insert_sorted(&mut self, mut key: Keyframe) -> usize {
        if !key.time.is_finite() {
            key.time = clamp01(key.time);
        }
        let index = self.keys.partition_point(|k| k.time <= key.time);
        self.keys.insert(index, key);
        index
    }

    /// Add a linear keyframe, keeping time order; returns its index
    pub fn add_key(&mut self, time: f32, value: f32) -> usize {
        self.insert_sorted(Keyframe::new(time, value))
    }

    /// Add a prepared keyframe, keeping time order; returns its index
    pub fn insert_key(&mut self, key: Keyframe) -> usize {
        self.insert_sorted(key)
    }

    /// Change the time and value of a key, re-sorting if it crosses a neighbour.
    ///
    /// Returns the key's index after the move.
    pub fn move_key(&mut self, index: usize, new_time: f32, new_value: f32) -> Result<usize> {
        EditError::check(IndexTarget::Keyframe, index, self.keys.len())?;

        let mut key = self.keys.remove(index);
        key.time = new_time;
        key.value = new_value;
        Ok(self.insert_sorted(key))
    }

    /// Remove a key, preserving the order of the rest
    pub fn remove_key(&mut self, index: usize) -> Result<Keyframe> {
        EditError::check(IndexTarget::Keyframe, index, self.keys.len())?;
        Ok(self.keys.remove(index))
    }

    /// Set the interpolation of the segment starting at `index`
    pub fn set_interpolation(&mut self, index: usize, mode: InterpolationMode) -> Result<()> {
        EditError::check(IndexTarget::Keyframe, index, self.keys.len())?;
        self.keys[index].interpolation = mode;
        Ok(())
    }

    /// Get all keyframes in time order
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Get a keyframe by index
    pub fn key(&self, index: usize) -> Option<&Keyframe> {
        self.keys.get(index)
    }

    /// Find the current index of a keyframe
    pub fn index_of(&self, id: KeyframeId) -> Option<usize> {
        self.keys.iter().position(|k| k.id == id)
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the curve has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for KeyframeCurve {
    fn default() -> Self {
        Self::linear()
    }
}
