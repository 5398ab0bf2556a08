use std::time::Instant;

use eframe::egui::{self, Context, Key, Sense, Vec2};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::mesh::{Animation, Canvas, MeshSettings, PlayState, Scene};

mod canvas;
mod ui;

use canvas::RetainedCanvas;
use ui::FrameRate;

pub struct AniMeshApp {
    animation: Animation<SmallRng>,
    canvas: RetainedCanvas,
    node_count: usize,
    speed: f64,
    nodes_built: bool,
    view_mode: ViewMode,
    fullscreen_seen: bool,
    windowed_size: Option<Vec2>,
    frame_rate: FrameRate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewMode {
    Windowed,
    Fullscreen,
    Compact,
}

impl ViewMode {
    fn shows_controls(self) -> bool {
        self == Self::Windowed
    }
}

impl AniMeshApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: MeshSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let state = if settings.paused {
            PlayState::Paused
        } else {
            PlayState::Running
        };
        let scene = Scene::new(Canvas::default(), settings.boundary, rng);

        Self {
            animation: Animation::new(scene, settings.speed, state),
            canvas: RetainedCanvas::default(),
            node_count: settings.nodes,
            speed: settings.speed,
            nodes_built: false,
            view_mode: if settings.fullscreen {
                ViewMode::Fullscreen
            } else {
                ViewMode::Windowed
            },
            fullscreen_seen: false,
            windowed_size: None,
            frame_rate: FrameRate::default(),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (space, escape) =
            ctx.input(|input| (input.key_pressed(Key::Space), input.key_pressed(Key::Escape)));
        if space {
            self.animation.toggle();
        }
        if escape && self.view_mode != ViewMode::Windowed {
            self.set_view_mode(ctx, ViewMode::Windowed);
        }
    }

    fn draw_mesh(&mut self, ui: &mut egui::Ui) {
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        self.animation.set_canvas(Canvas::new(rect.width() as f64, rect.height() as f64));

        if !self.nodes_built {
            self.animation.set_node_count(self.node_count, &mut self.canvas);
            self.nodes_built = true;
        }

        let now = Instant::now();
        self.animation.advance(now, &mut self.canvas);

        let color = ui.visuals().strong_text_color();
        self.canvas.paint(&ui.painter_at(rect), rect, color);

        if let Some(wait) = self.animation.next_tick_in(now) {
            ui.ctx().request_repaint_after(wait);
        }
    }
}

impl eframe::App for AniMeshApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.update_fps_counter(ctx);
        self.follow_viewport(ctx);
        self.handle_shortcuts(ctx);

        if self.view_mode.shows_controls() {
            egui::TopBottomPanel::top("controls")
                .resizable(false)
                .show(ctx, |ui| self.draw_controls(ui));
        } else if self.view_mode == ViewMode::Fullscreen {
            ctx.set_cursor_icon(egui::CursorIcon::None);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_mesh(ui));
    }
}
