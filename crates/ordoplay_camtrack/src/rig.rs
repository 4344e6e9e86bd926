// SPDX-License-Identifier: MIT OR Apache-2.0
//! Handles to the host's cameras and audio.
//!
//! The timeline never owns a camera. It drives whatever the host plugs in
//! through these traits. Every handle is optional: a missing handle turns
//! the matching side effect into a no-op.

/// A camera owned by the host
pub trait CameraHandle {
    /// Current world position
    fn position(&self) -> [f32; 3];

    /// Move the camera
    fn set_position(&mut self, position: [f32; 3]);

    /// Enable or disable rendering through this camera
    fn set_enabled(&mut self, enabled: bool);
}

/// Audio that accompanies playback
pub trait AudioHandle {
    /// Start from the beginning
    fn play(&mut self);

    /// Stop playback
    fn stop(&mut self);
}

/// The set of external handles a session drives
#[derive(Default)]
pub struct CameraRig {
    primary: Option<Box<dyn CameraHandle>>,
    playback: Option<Box<dyn CameraHandle>>,
    audio: Option<Box<dyn AudioHandle>>,
}

impl CameraRig {
    /// Create a rig with no handles attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the gameplay camera
    pub fn with_primary(mut self, camera: impl CameraHandle + 'static) -> Self {
        self.primary = Some(Box::new(camera));
        self
    }

    /// Attach the camera the timeline moves
    pub fn with_playback(mut self, camera: impl CameraHandle + 'static) -> Self {
        self.playback = Some(Box::new(camera));
        self
    }

    /// Attach the playback audio
    pub fn with_audio(mut self, audio: impl AudioHandle + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Whether a primary camera is attached
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Whether a playback camera is attached
    pub fn has_playback(&self) -> bool {
        self.playback.is_some()
    }

    /// Whether audio is attached
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Read the primary camera position, or the origin without one
    pub(crate) fn capture_base(&self) -> [f32; 3] {
        match &self.primary {
            Some(camera) => camera.position(),
            None => {
                tracing::debug!("No primary camera attached, using origin as base position");
                [0.0; 3]
            }
        }
    }

    /// Hand the view to the playback camera and start audio
    pub(crate) fn activate(&mut self) {
        if let Some(camera) = self.primary.as_mut() {
            camera.set_enabled(false);
        }
        match self.playback.as_mut() {
            Some(camera) => camera.set_enabled(true),
            None => tracing::debug!("No playback camera attached"),
        }
        if let Some(audio) = self.audio.as_mut() {
            audio.play();
        }
    }

    /// Give the view back to the primary camera and stop audio
    pub(crate) fn deactivate(&mut self) {
        if let Some(camera) = self.playback.as_mut() {
            camera.set_enabled(false);
        }
        if let Some(camera) = self.primary.as_mut() {
            camera.set_enabled(true);
        }
        if let Some(audio) = self.audio.as_mut() {
            audio.stop();
        }
    }

    /// Write the playback camera position
    pub(crate) fn write_pose(&mut self, position: [f32; 3]) {
        if let Some(camera) = self.playback.as_mut() {
            camera.set_position(position);
        }
    }
}

impl std::fmt::Debug for CameraRig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraRig")
            .field("primary", &self.has_primary())
            .field("playback", &self.has_playback())
            .field("audio", &self.has_audio())
            .finish()
    }
}

/// Shared-state test doubles for the rig traits
#[cfg(test)]
pub(crate) mod probe {
    use super::{AudioHandle, CameraHandle};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Observable camera state
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct CameraState {
        pub position: [f32; 3],
        pub enabled: bool,
        pub writes: usize,
    }

    /// Camera that records into shared state
    #[derive(Clone, Default)]
    pub struct ProbeCamera(pub Rc<RefCell<CameraState>>);

    impl ProbeCamera {
        pub fn at(position: [f32; 3], enabled: bool) -> Self {
            Self(Rc::new(RefCell::new(CameraState { position, enabled, writes: 0 })))
        }

        pub fn state(&self) -> CameraState {
            self.0.borrow().clone()
        }
    }

    impl CameraHandle for ProbeCamera {
        fn position(&self) -> [f32; 3] {
            self.0.borrow().position
        }

        fn set_position(&mut self, position: [f32; 3]) {
            let mut state = self.0.borrow_mut();
            state.position = position;
            state.writes += 1;
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.0.borrow_mut().enabled = enabled;
        }
    }

    /// Audio that records whether it is playing
    #[derive(Clone, Default)]
    pub struct ProbeAudio(pub Rc<RefCell<(bool, usize)>>);

    impl ProbeAudio {
        pub fn playing(&self) -> bool {
            self.0.borrow().0
        }

        pub fn starts(&self) -> usize {
            self.0.borrow().1
        }
    }

    impl AudioHandle for ProbeAudio {
        fn play(&mut self) {
            let mut state = self.0.borrow_mut();
            state.0 = true;
            state.1 += 1;
        }

        fn stop(&mut self) {
            self.0.borrow_mut().0 = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::probe::{ProbeAudio, ProbeCamera};
    use super::*;

    #[test]
    fn test_empty_rig_is_noop() {
        let mut rig = CameraRig::new();
        assert_eq!(rig.capture_base(), [0.0; 3]);
        rig.activate();
        rig.write_pose([1.0, 2.0, 3.0]);
        rig.deactivate();
    }

    #[test]
    fn test_activate_and_deactivate() {
        let primary = ProbeCamera::at([1.0, 2.0, 3.0], true);
        let playback = ProbeCamera::default();
        let audio = ProbeAudio::default();
        let mut rig = CameraRig::new()
            .with_primary(primary.clone())
            .with_playback(playback.clone())
            .with_audio(audio.clone());

        assert_eq!(rig.capture_base(), [1.0, 2.0, 3.0]);

        rig.activate();
        assert!(!primary.state().enabled);
        assert!(playback.state().enabled);
        assert!(audio.playing());

        rig.write_pose([4.0, 5.0, 6.0]);
        assert_eq!(playback.state().position, [4.0, 5.0, 6.0]);
        assert_eq!(primary.state().position, [1.0, 2.0, 3.0]);

        rig.deactivate();
        assert!(primary.state().enabled);
        assert!(!playback.state().enabled);
        assert!(!audio.playing());
    }
}
