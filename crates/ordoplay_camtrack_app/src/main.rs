// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` camera timeline preview.
//!
//! Runs one playback of a demo camera track at a fixed frame rate and logs
//! the poses written to the playback camera.
//!
//! Usage: `ordoplay_camtrack [settings.ron]`

mod preview;
mod stage;

use ordoplay_camtrack::{CameraRig, CameraSession, EasingPreset, SettingsError, TimelineSettings};
use stage::{StageAudio, StageCamera};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keys baked from the demo preset
const DEMO_PRESET_SAMPLES: usize = 9;

/// Preview errors
#[derive(Debug, Error)]
enum AppError {
    #[error("Failed to load settings from {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: SettingsError,
    },
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ordoplay_camtrack=debug,ordoplay_camtrack_app=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OrdoPlay camera timeline preview v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        tracing::error!("Preview failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let settings = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => TimelineSettings::load(&path).map_err(|source| AppError::Settings { path, source })?,
        None => TimelineSettings::default(),
    };
    tracing::debug!(?settings, "Using settings");

    let rig = CameraRig::new()
        .with_primary(StageCamera::new("main", [0.0, 1.5, -4.0], true))
        .with_playback(StageCamera::new("playback", [0.0; 3], false))
        .with_audio(StageAudio::new());

    let mut session = CameraSession::new(rig, settings);
    session.apply_preset(EasingPreset::EaseInOutQuad, DEMO_PRESET_SAMPLES);
    session.add_offset_layer([0.0, 3.0, 1.0]);

    let summary = preview::run(&mut session, &preview::default_schedule());

    tracing::info!(
        frames = summary.frames,
        rejected = summary.rejected,
        "Preview finished at {:?}",
        summary.final_position,
    );
    Ok(())
}
