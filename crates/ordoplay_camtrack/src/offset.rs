// SPDX-License-Identifier: MIT OR Apache-2.0
//! Additive positional offset layers.

use crate::error::{EditError, IndexTarget, Result};
use serde::{Deserialize, Serialize};

/// Component axis of a 3D vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// All axes in component order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a `[f32; 3]`
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Get the display name
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

/// One additive displacement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OffsetLayer {
    /// Offset (x, y, z). Not clamped here; editors bound it.
    pub offset: [f32; 3],
}

impl OffsetLayer {
    /// Create a layer from a vector
    pub fn new(offset: [f32; 3]) -> Self {
        Self { offset }
    }
}

/// Ordered stack of offset layers summed into a single offset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OffsetStack {
    layers: Vec<OffsetLayer>,
}

impl OffsetStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer; returns its index
    pub fn add_layer(&mut self, offset: [f32; 3]) -> usize {
        self.layers.push(OffsetLayer::new(offset));
        self.layers.len() - 1
    }

    /// Overwrite one axis of one layer
    pub fn set_layer_component(&mut self, index: usize, axis: Axis, value: f32) -> Result<()> {
        EditError::check(IndexTarget::OffsetLayer, index, self.layers.len())?;
        self.layers[index].offset[axis.index()] = value;
        Ok(())
    }

    /// Remove a layer; later layers shift down by one index
    pub fn remove_layer(&mut self, index: usize) -> Result<OffsetLayer> {
        EditError::check(IndexTarget::OffsetLayer, index, self.layers.len())?;
        Ok(self.layers.remove(index))
    }

    /// Componentwise sum of every layer
    pub fn sum(&self) -> [f32; 3] {
        self.layers.iter().fold([0.0; 3], |acc, layer| {
            [
                acc[0] + layer.offset[0],
                acc[1] + layer.offset[1],
                acc[2] + layer.offset[2],
            ]
        })
    }

    /// Get all layers
    pub fn layers(&self) -> &[OffsetLayer] {
        &self.layers
    }

    /// Get a layer by index
    pub fn layer(&self, index: usize) -> Option<&OffsetLayer> {
        self.layers.get(index)
    }

    /// Get layer count
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack has no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
