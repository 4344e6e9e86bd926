// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing presets that can be baked into a keyframe curve.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Parameters for the elastic preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticParams {
    /// Number of full oscillations over [0, 1]
    pub oscillations: u32,
    /// Exponential decay factor
    pub decay: f32,
}

impl Default for ElasticParams {
    fn default() -> Self {
        Self {
            oscillations: 3,
            decay: 3.0,
        }
    }
}

/// Named easing function
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum EasingPreset {
    /// Identity
    #[default]
    Linear,
    /// Quadratic ease in
    EaseInQuad,
    /// Quadratic ease out
    EaseOutQuad,
    /// Quadratic ease in and out
    EaseInOutQuad,
    /// Decaying oscillation settling on 1
    Elastic(ElasticParams),
}

impl EasingPreset {
    /// Every preset with default parameters, in menu order
    pub const ALL: [EasingPreset; 5] = [
        Self::Linear,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::Elastic(ElasticParams { oscillations: 3, decay: 3.0 }),
    ];

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::EaseInQuad => "EaseInQuad",
            Self::EaseOutQuad => "EaseOutQuad",
            Self::EaseInOutQuad => "EaseInOutQuad",
            Self::Elastic(_) => "Elastic",
        }
    }

    /// Evaluate the preset at `t`, clamped to [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::Elastic(params) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let sin_term = (params.oscillations as f32 * 2.0 * PI * t).sin();
                let decay_term = (-params.decay * t).exp();
                1.0 - sin_term * decay_term
            }
        }
    }
}
