use eframe::egui::{self, Align, Layout, Ui};

use crate::mesh::{NODE_COUNT_RANGE, PlayState, SPEED_RANGE};

use super::super::{AniMeshApp, ViewMode};

/// Rounds to one decimal with halves away from zero.
fn speed_label(speed: f64) -> String {
    format!("Speed: {:.1}", (speed * 10.0).round() / 10.0)
}

impl AniMeshApp {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("AniMesh");
            ui.separator();

            ui.label(format!("Nodes: {}", self.node_count));
            let nodes_response = ui
                .add(egui::Slider::new(&mut self.node_count, NODE_COUNT_RANGE).show_value(false))
                .on_hover_text("Rebuilds the mesh with a fresh set of nodes.");
            if nodes_response.changed() {
                self.animation.set_node_count(self.node_count, &mut self.canvas);
            }

            ui.label(speed_label(self.speed));
            let speed_response = ui
                .add(
                    egui::Slider::new(&mut self.speed, SPEED_RANGE)
                        .step_by(0.1)
                        .show_value(false),
                )
                .on_hover_text("Scales how far nodes travel per tick.");
            if speed_response.changed() {
                self.animation.set_speed(self.speed);
            }

            let play_label = match self.animation.state() {
                PlayState::Running => "Pause",
                PlayState::Paused => "Play",
            };
            if ui
                .button(play_label)
                .on_hover_text("Space also toggles playback.")
                .clicked()
            {
                self.animation.toggle();
            }

            if ui
                .button("Full screen")
                .on_hover_text("Escape returns to the window.")
                .clicked()
            {
                self.set_view_mode(ui.ctx(), ViewMode::Fullscreen);
            }
            if ui
                .button("Compact overlay")
                .on_hover_text("Small always-on-top window. Escape returns.")
                .clicked()
            {
                self.set_view_mode(ui.ctx(), ViewMode::Compact);
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(self.visible_mesh_text());
                ui.label(self.fps_display_text());
            });
        });
    }
}
