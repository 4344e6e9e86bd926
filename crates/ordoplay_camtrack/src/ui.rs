// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline editor panel.
//!
//! Features:
//! - Play/stop transport and time readout
//! - Scrub slider
//! - Curve preview with playhead and keyframe markers
//! - Keyframe and offset layer rows
//! - Easing presets
//! - Undo/redo
//!
//! The panel never mutates the session while drawing. Every widget pushes an
//! [`EditCommand`] into a batch that is applied after the pass.

use crate::curve::KeyframeCurve;
use crate::easing::EasingPreset;
use crate::editing::{EditBatch, EditCommand};
use crate::keyframe::KeyframeId;
use crate::offset::Axis;
use crate::session::CameraSession;
use crate::timeline::PoseMode;
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

const CURVE_HEIGHT: f32 = 140.0;
const CURVE_SAMPLES: usize = 64;
const CURVE_MARGIN: f32 = 8.0;
const KEYFRAME_RADIUS: f32 = 4.0;
const PLAYHEAD_WIDTH: f32 = 2.0;
const DEFAULT_PRESET_SAMPLES: usize = 9;

/// Actions that are not data edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Play,
    Stop,
    Undo,
    Redo,
}

/// Camera timeline editor state
pub struct TimelinePanel {
    /// Keyframe highlighted in the curve view
    pub selected_keyframe: Option<KeyframeId>,
    /// Preset chosen in the preset picker
    pub preset: EasingPreset,
    /// Keys baked when applying a preset
    pub preset_samples: usize,
    /// Show the curve preview
    pub show_curve: bool,
    /// Last rejected edit, shown until the next batch is applied
    last_error: Option<String>,
}

impl TimelinePanel {
    /// Create a new panel
    pub fn new() -> Self {
        Self {
            selected_keyframe: None,
            preset: EasingPreset::Linear,
            preset_samples: DEFAULT_PRESET_SAMPLES,
            show_curve: true,
            last_error: None,
        }
    }

    /// Render the panel and apply the edits it produced
    pub fn ui(&mut self, ui: &mut egui::Ui, session: &mut CameraSession) {
        let mut batch = EditBatch::new();
        let mut transport = None;
        let mut seal = false;

        self.render_toolbar(ui, session, &mut transport);
        ui.separator();
        self.render_scrubber(ui, session, &mut batch);
        if self.show_curve {
            self.render_curve(ui, session);
        }
        ui.separator();
        self.render_keyframes(ui, session, &mut batch, &mut seal);
        ui.separator();
        self.render_offsets(ui, session, &mut batch, &mut seal);
        ui.separator();
        self.render_presets(ui, &mut batch);
        self.handle_input(ui, session, &mut batch, &mut transport);

        if let Some(error) = &self.last_error {
            ui.colored_label(Color32::from_rgb(255, 120, 100), error);
        }

        if !batch.is_empty() {
            let rejected = session.apply_batch(batch);
            self.last_error = rejected.last().map(|(_, err)| err.to_string());
        }
        if seal {
            session.seal_history();
        }

        match transport {
            Some(Transport::Play) => session.begin_playback(),
            Some(Transport::Stop) => session.end_playback(),
            Some(Transport::Undo) => {
                if let Err(err) = session.undo() {
                    tracing::debug!("{err}");
                }
            }
            Some(Transport::Redo) => {
                if let Err(err) = session.redo() {
                    tracing::debug!("{err}");
                }
            }
            None => {}
        }
    }

    /// Render toolbar with playback controls
    fn render_toolbar(&self, ui: &mut egui::Ui, session: &CameraSession, transport: &mut Option<Transport>) {
        ui.horizontal(|ui| {
            if session.timeline().is_playing() {
                if ui.button("⏹ Stop").on_hover_text("Stop (Space)").clicked() {
                    *transport = Some(Transport::Stop);
                }
            } else if ui.button("▶ Play").on_hover_text("Play from start (Space)").clicked() {
                *transport = Some(Transport::Play);
            }

            ui.separator();
            ui.monospace(format!("t = {:.3}", session.timeline().current_time()));

            ui.separator();
            let history = session.history();
            let undo = ui.add_enabled(history.can_undo(), egui::Button::new("Undo"));
            let undo = match history.undo_description() {
                Some(description) => undo.on_hover_text(format!("Undo {description}")),
                None => undo,
            };
            if undo.clicked() {
                *transport = Some(Transport::Undo);
            }
            if ui.add_enabled(history.can_redo(), egui::Button::new("Redo")).clicked() {
                *transport = Some(Transport::Redo);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let pose = session.preview_pose();
                ui.label(format!(
                    "{} | pose ({:.2}, {:.2}, {:.2}) | eased {:.3}",
                    session.settings().pose_mode.name(),
                    pose.position[0],
                    pose.position[1],
                    pose.position[2],
                    pose.eased,
                ));
                if session.settings().pose_mode == PoseMode::OffsetSum {
                    ui.colored_label(Color32::from_rgb(255, 200, 100), "⚠")
                        .on_hover_text("Eased value does not move the camera in this pose mode");
                }
            });
        });
    }

    /// Render the time slider
    fn render_scrubber(&self, ui: &mut egui::Ui, session: &CameraSession, batch: &mut EditBatch) {
        let timeline = session.timeline();
        let enabled = !timeline.is_playing() || session.settings().scrub_during_playback;

        let mut time = timeline.current_time();
        let response = ui.add_enabled(
            enabled,
            egui::Slider::new(&mut time, 0.0..=1.0).text("Time"),
        );
        if response.changed() {
            batch.push(EditCommand::Scrub { time });
        }
    }

    /// Render the curve preview
    fn render_curve(&mut self, ui: &mut egui::Ui, session: &CameraSession) {
        let size = Vec2::new(ui.available_width(), CURVE_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        let painter = ui.painter_at(rect);
        let view = CurveView::new(rect, session.curve());

        painter.rect_filled(rect, 0.0, Color32::from_gray(30));

        // Zero and one guides
        for value in [0.0, 1.0] {
            let y = view.value_to_y(value);
            painter.line_segment(
                [Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)],
                Stroke::new(1.0, Color32::from_gray(50)),
            );
        }

        let curve = session.curve();
        let points: Vec<Pos2> = (0..=CURVE_SAMPLES)
            .map(|i| {
                let t = i as f32 / CURVE_SAMPLES as f32;
                Pos2::new(view.time_to_x(t), view.value_to_y(curve.evaluate(t)))
            })
            .collect();
        painter.add(egui::Shape::line(points, Stroke::new(2.0, Color32::from_rgb(100, 150, 255))));

        for key in curve.keys() {
            let pos = Pos2::new(view.time_to_x(key.time.clamp(0.0, 1.0)), view.value_to_y(key.value));
            let fill = if self.selected_keyframe == Some(key.id) {
                Color32::from_rgb(255, 200, 100)
            } else {
                Color32::WHITE
            };
            painter.circle_filled(pos, KEYFRAME_RADIUS, fill);
            painter.circle_stroke(pos, KEYFRAME_RADIUS, Stroke::new(1.0, Color32::from_gray(80)));
        }

        let playhead_x = view.time_to_x(session.timeline().current_time());
        painter.line_segment(
            [Pos2::new(playhead_x, rect.min.y), Pos2::new(playhead_x, rect.max.y)],
            Stroke::new(PLAYHEAD_WIDTH, Color32::from_rgb(255, 100, 100)),
        );

        // Click selects the nearest keyframe
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let time = view.x_to_time(pos.x);
                self.selected_keyframe = nearest_keyframe(curve, time);
            }
        }
    }

    /// Render keyframe rows
    fn render_keyframes(&mut self, ui: &mut egui::Ui, session: &CameraSession, batch: &mut EditBatch, seal: &mut bool) {
        ui.horizontal(|ui| {
            ui.strong(format!("Keyframes ({})", session.curve().len()));
            if ui.button("+ Key at playhead").clicked() {
                batch.push(EditCommand::AddKeyframeAtPlayhead);
            }
        });

        for (index, key) in session.curve().keys().iter().enumerate() {
            ui.push_id(key.id.0, |ui| {
                ui.horizontal(|ui| {
                    let selected = self.selected_keyframe == Some(key.id);
                    if ui.selectable_label(selected, format!("#{index}")).clicked() {
                        self.selected_keyframe = Some(key.id);
                    }

                    let mut time = key.time;
                    let mut value = key.value;
                    let time_response = ui.add(egui::DragValue::new(&mut time).speed(0.005).prefix("t "));
                    let value_response = ui.add(egui::DragValue::new(&mut value).speed(0.01).prefix("v "));
                    if time_response.changed() || value_response.changed() {
                        batch.push(EditCommand::MoveKeyframe { index, time, value });
                    }
                    if time_response.drag_stopped() || value_response.drag_stopped() {
                        *seal = true;
                    }

                    if ui.button(key.interpolation.name()).on_hover_text("Toggle interpolation").clicked() {
                        batch.push(EditCommand::SetInterpolation { index, mode: key.interpolation.toggled() });
                    }
                    if ui.small_button("✖").on_hover_text("Remove keyframe").clicked() {
                        batch.push(EditCommand::RemoveKeyframe { index });
                    }
                });
            });
        }
    }

    /// Render offset layer rows
    fn render_offsets(&self, ui: &mut egui::Ui, session: &CameraSession, batch: &mut EditBatch, seal: &mut bool) {
        let bounds = session.settings().offset_bounds();
        let sum = session.offsets().sum();

        ui.horizontal(|ui| {
            ui.strong(format!("Offset layers ({})", session.offsets().len()));
            if ui.button("+ Layer").clicked() {
                batch.push(EditCommand::AddOffsetLayer { offset: [0.0; 3] });
            }
            ui.label(format!("sum ({:.2}, {:.2}, {:.2})", sum[0], sum[1], sum[2]));
        });

        for (index, layer) in session.offsets().layers().iter().enumerate() {
            ui.push_id(("offset_layer", index), |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("#{index}"));
                    for axis in Axis::ALL {
                        let stored = layer.offset[axis.index()];
                        let mut value = stored;
                        let response = ui.add(egui::Slider::new(&mut value, bounds.clone()).text(axis.name()));
                        // Clamping an out-of-range value for display is not an edit
                        if response.changed() && value != stored.clamp(*bounds.start(), *bounds.end()) {
                            batch.push(EditCommand::SetOffsetComponent { index, axis, value });
                        }
                        if response.drag_stopped() {
                            *seal = true;
                        }
                    }
                    if ui.small_button("✖").on_hover_text("Remove layer").clicked() {
                        batch.push(EditCommand::RemoveOffsetLayer { index });
                    }
                });
            });
        }
    }

    /// Render the preset picker
    fn render_presets(&mut self, ui: &mut egui::Ui, batch: &mut EditBatch) {
        ui.horizontal(|ui| {
            ui.label("Preset:");
            egui::ComboBox::from_id_salt("camtrack_preset")
                .selected_text(self.preset.name())
                .show_ui(ui, |ui| {
                    for preset in EasingPreset::ALL {
                        ui.selectable_value(&mut self.preset, preset, preset.name());
                    }
                });

            if let EasingPreset::Elastic(params) = &mut self.preset {
                ui.add(egui::DragValue::new(&mut params.oscillations).range(1..=12).prefix("osc "));
                ui.add(egui::DragValue::new(&mut params.decay).range(0.0..=20.0).speed(0.1).prefix("decay "));
            }

            ui.add(egui::DragValue::new(&mut self.preset_samples).range(2..=64).suffix(" keys"));
            if ui.button("Apply").clicked() {
                batch.push(EditCommand::ApplyPreset { preset: self.preset, samples: self.preset_samples });
            }
        });
    }

    /// Handle keyboard shortcuts
    fn handle_input(
        &mut self,
        ui: &mut egui::Ui,
        session: &CameraSession,
        batch: &mut EditBatch,
        transport: &mut Option<Transport>,
    ) {
        if ui.ctx().wants_keyboard_input() {
            return;
        }

        ui.input(|input| {
            if input.key_pressed(egui::Key::Space) {
                *transport = Some(if session.timeline().is_playing() {
                    Transport::Stop
                } else {
                    Transport::Play
                });
            }

            if input.key_pressed(egui::Key::Delete) {
                if let Some(index) = self.selected_keyframe.and_then(|id| session.curve().index_of(id)) {
                    batch.push(EditCommand::RemoveKeyframe { index });
                    self.selected_keyframe = None;
                }
            }

            if input.modifiers.command && input.key_pressed(egui::Key::Z) {
                *transport = Some(if input.modifiers.shift { Transport::Redo } else { Transport::Undo });
            }
        });
    }
}

impl Default for TimelinePanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping between curve space and screen space
struct CurveView {
    rect: Rect,
    min_value: f32,
    max_value: f32,
}

impl CurveView {
    fn new(rect: Rect, curve: &KeyframeCurve) -> Self {
        let (min_value, max_value) = value_range(curve);
        Self { rect, min_value, max_value }
    }

    fn time_to_x(&self, time: f32) -> f32 {
        let width = (self.rect.width() - 2.0 * CURVE_MARGIN).max(1.0);
        self.rect.min.x + CURVE_MARGIN + time * width
    }

    fn x_to_time(&self, x: f32) -> f32 {
        let width = (self.rect.width() - 2.0 * CURVE_MARGIN).max(1.0);
        ((x - self.rect.min.x - CURVE_MARGIN) / width).clamp(0.0, 1.0)
    }

    fn value_to_y(&self, value: f32) -> f32 {
        let height = (self.rect.height() - 2.0 * CURVE_MARGIN).max(1.0);
        let normalized = (value - self.min_value) / (self.max_value - self.min_value);
        self.rect.max.y - CURVE_MARGIN - normalized * height
    }
}

/// Vertical extent of the curve view: [0, 1] widened to fit every key
fn value_range(curve: &KeyframeCurve) -> (f32, f32) {
    curve
        .keys()
        .iter()
        .map(|k| k.value)
        .filter(|v| v.is_finite())
        .fold((0.0_f32, 1.0_f32), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Keyframe closest in time to `time`
fn nearest_keyframe(curve: &KeyframeCurve, time: f32) -> Option<KeyframeId> {
    curve
        .keys()
        .iter()
        .min_by(|a, b| (a.time - time).abs().total_cmp(&(b.time - time).abs()))
        .map(|k| k.id)
}
