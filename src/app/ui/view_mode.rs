use eframe::egui::{Context, Vec2, ViewportCommand, WindowLevel, vec2};

use super::super::{AniMeshApp, ViewMode};

const COMPACT_SIZE: Vec2 = vec2(480.0, 270.0);

impl AniMeshApp {
    pub(in crate::app) fn set_view_mode(&mut self, ctx: &Context, mode: ViewMode) {
        if self.view_mode == mode {
            return;
        }
        log::debug!("view mode {:?} -> {mode:?}", self.view_mode);

        match self.view_mode {
            ViewMode::Fullscreen => ctx.send_viewport_cmd(ViewportCommand::Fullscreen(false)),
            ViewMode::Compact => {
                ctx.send_viewport_cmd(ViewportCommand::WindowLevel(WindowLevel::Normal));
                if let Some(size) = self.windowed_size.take() {
                    ctx.send_viewport_cmd(ViewportCommand::InnerSize(size));
                }
            }
            ViewMode::Windowed => {
                self.windowed_size =
                    ctx.input(|input| input.viewport().inner_rect.map(|rect| rect.size()));
            }
        }

        match mode {
            ViewMode::Fullscreen => ctx.send_viewport_cmd(ViewportCommand::Fullscreen(true)),
            ViewMode::Compact => {
                ctx.send_viewport_cmd(ViewportCommand::WindowLevel(WindowLevel::AlwaysOnTop));
                ctx.send_viewport_cmd(ViewportCommand::InnerSize(COMPACT_SIZE));
            }
            ViewMode::Windowed => {}
        }

        self.view_mode = mode;
        self.fullscreen_seen = false;
    }

    /// Brings the controls back when the window manager leaves full screen
    /// on its own.
    pub(in crate::app) fn follow_viewport(&mut self, ctx: &Context) {
        if self.view_mode != ViewMode::Fullscreen {
            return;
        }

        match ctx.input(|input| input.viewport().fullscreen) {
            Some(true) => self.fullscreen_seen = true,
            Some(false) if self.fullscreen_seen => {
                log::debug!("full screen left outside the app");
                self.view_mode = ViewMode::Windowed;
                self.fullscreen_seen = false;
            }
            _ => {}
        }
    }
}
