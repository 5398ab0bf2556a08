use std::collections::VecDeque;

use eframe::egui::Context;

use crate::mesh::BoundaryPolicy;

use super::super::AniMeshApp;

/// Rolling window of per-frame rates.
#[derive(Debug, Default)]
pub(in crate::app) struct FrameRate {
    latest: f32,
    window: VecDeque<f32>,
}

impl FrameRate {
    const WINDOW: usize = 180;

    fn record(&mut self, frame_secs: f32) {
        if frame_secs <= f32::EPSILON {
            return;
        }

        self.latest = frame_secs.recip().min(1000.0);
        if self.window.len() == Self::WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(self.latest);
    }

    fn summary(&self) -> String {
        let mut text = format!("FPS {:.0}", self.latest);
        if !self.window.is_empty() {
            let mean = self.window.iter().sum::<f32>() / self.window.len() as f32;
            text.push_str(&format!(" | avg {mean:.1}"));
        }
        if self.latest > 0.0 {
            text.push_str(&format!(" | {:.1} ms", 1000.0 / self.latest));
        }
        text
    }
}

fn mesh_status(dots: usize, lines: usize, policy: BoundaryPolicy, dropped: u64) -> String {
    let mut text = format!("{dots} nodes / {lines} lines / {policy:?} edges");
    if dropped > 0 {
        text.push_str(&format!(" / {dropped} dropped frames"));
    }
    text
}

impl AniMeshApp {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        self.frame_rate.record(ctx.input(|input| input.stable_dt));
    }

    pub(in crate::app) fn fps_display_text(&self) -> String {
        self.frame_rate.summary()
    }

    pub(in crate::app) fn visible_mesh_text(&self) -> String {
        let sync = self.animation.sync();
        mesh_status(
            sync.dot_count(),
            sync.line_count(),
            self.animation.scene().policy(),
            self.animation.suppressed_errors(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rate_window() {
        let mut rate = FrameRate::default();
        assert_eq!(rate.summary(), "FPS 0");

        rate.record(0.0);
        assert!(rate.window.is_empty());

        rate.record(0.02);
        rate.record(0.01);
        assert_eq!(rate.summary(), "FPS 100 | avg 75.0 | 10.0 ms");

        for _ in 0..500 {
            rate.record(0.05);
        }
        assert_eq!(rate.window.len(), FrameRate::WINDOW);
        assert_eq!(rate.summary(), "FPS 20 | avg 20.0 | 50.0 ms");
    }

    #[test]
    fn test_mesh_status() {
        assert_eq!(
            mesh_status(16, 7, BoundaryPolicy::Inset, 0),
            "16 nodes / 7 lines / Inset edges"
        );
        assert_eq!(
            mesh_status(2, 0, BoundaryPolicy::Overshoot, 3),
            "2 nodes / 0 lines / Overshoot edges / 3 dropped frames"
        );
    }
}
