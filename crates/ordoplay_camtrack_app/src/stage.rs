// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stand-in camera and audio handles for headless previews.
//!
//! They hold plain state and log every change, so a preview run reads like
//! a trace of what a real host would have been told to do.

use ordoplay_camtrack::{AudioHandle, CameraHandle};

/// A camera that only records its state
#[derive(Debug, Clone, PartialEq)]
pub struct StageCamera {
    name: String,
    position: [f32; 3],
    enabled: bool,
}

impl StageCamera {
    /// Create a camera at `position`
    pub fn new(name: impl Into<String>, position: [f32; 3], enabled: bool) -> Self {
        Self {
            name: name.into(),
            position,
            enabled,
        }
    }

    /// Whether the camera is rendering
    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl CameraHandle for StageCamera {
    fn position(&self) -> [f32; 3] {
        self.position
    }

    fn set_position(&mut self, position: [f32; 3]) {
        tracing::trace!(camera = %self.name, ?position, "Camera moved");
        self.position = position;
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            tracing::debug!(camera = %self.name, enabled, "Camera toggled");
        }
        self.enabled = enabled;
    }
}

/// An audio track that only logs
#[derive(Debug, Default)]
pub struct StageAudio {
    playing: bool,
}

impl StageAudio {
    /// Create a stopped track
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the track is playing
    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl AudioHandle for StageAudio {
    fn play(&mut self) {
        tracing::debug!("Audio started");
        self.playing = true;
    }

    fn stop(&mut self) {
        if self.playing {
            tracing::debug!("Audio stopped");
        }
        self.playing = false;
    }
}
