use std::time::{Duration, Instant};

use rand::Rng;

use super::{Canvas, Scene, Surface, SurfaceSync};

pub const TICK_INTERVAL: Duration = Duration::from_millis(20);
const MIN_DELTA_TIME: f64 = 0.5;

/// Scales the time since the previous tick by the speed multiplier, floored
/// so a fast frame never stalls the motion.
pub fn delta_time(speed: f64, elapsed_millis: u64) -> f64 {
    (speed * elapsed_millis as f64 / 100.0).max(MIN_DELTA_TIME)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Running,
    Paused,
}

/// Drives a [`Scene`] on a fixed tick and mirrors each frame onto a surface.
pub struct Animation<R> {
    scene: Scene<R>,
    sync: SurfaceSync,
    state: PlayState,
    speed: f64,
    tick_started: Option<Instant>,
    suppressed_errors: u64,
}

impl<R: Rng> Animation<R> {
    pub fn new(scene: Scene<R>, speed: f64, state: PlayState) -> Self {
        Self {
            scene,
            sync: SurfaceSync::default(),
            state,
            speed,
            tick_started: None,
            suppressed_errors: 0,
        }
    }

    pub fn scene(&self) -> &Scene<R> {
        &self.scene
    }

    pub fn sync(&self) -> &SurfaceSync {
        &self.sync
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn suppressed_errors(&self) -> u64 {
        self.suppressed_errors
    }

    pub fn set_canvas(&mut self, canvas: Canvas) {
        if self.scene.canvas() != canvas {
            log::debug!("canvas resized to {:.0}x{:.0}", canvas.width, canvas.height);
            self.scene.set_canvas(canvas);
        }
    }

    /// Replaces every node and visual, then shows the new nodes immediately.
    pub fn set_node_count(&mut self, count: usize, surface: &mut impl Surface) {
        log::info!("rebuilding mesh with {count} nodes");
        self.scene.set_node_count(count);

        if let Err(error) = self.rebuild_surface(count, surface) {
            self.suppress(error);
        }
    }

    fn rebuild_surface(&mut self, count: usize, surface: &mut impl Surface) -> anyhow::Result<()> {
        let rebuilt = self.sync.rebuild(surface, count);
        let shown = self.sync.apply(&self.scene.snapshot(), surface);
        rebuilt.and(shown)
    }

    pub fn toggle(&mut self) {
        match self.state {
            PlayState::Running => self.pause(),
            PlayState::Paused => self.resume(),
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlayState::Running {
            log::debug!("animation paused");
            self.state = PlayState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlayState::Paused {
            log::debug!("animation resumed");
            self.state = PlayState::Running;
            self.tick_started = None;
        }
    }

    /// Time left until the next tick is due, or `None` while paused.
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        if self.state == PlayState::Paused {
            return None;
        }

        Some(match self.tick_started {
            Some(started) => {
                TICK_INTERVAL.saturating_sub(now.saturating_duration_since(started))
            }
            None => Duration::ZERO,
        })
    }

    /// Runs one tick when running and due. A failed surface update never
    /// stops the animation; it is counted and logged instead.
    pub fn advance(&mut self, now: Instant, surface: &mut impl Surface) -> bool {
        if self.next_tick_in(now) != Some(Duration::ZERO) {
            return false;
        }

        let elapsed_millis = self
            .tick_started
            .map(|started| now.saturating_duration_since(started).as_millis() as u64)
            .unwrap_or(0);
        self.tick_started = Some(now);

        let frame = self.scene.tick(delta_time(self.speed, elapsed_millis));
        if frame.resets > 0 {
            log::trace!("{} nodes re-entered from an edge", frame.resets);
        }
        if let Err(error) = self.sync.apply(&frame, surface) {
            self.suppress(error);
        }

        true
    }

    fn suppress(&mut self, error: anyhow::Error) {
        self.suppressed_errors += 1;
        if self.suppressed_errors == 1 {
            log::warn!("frame update failed, continuing: {error:#}");
        } else {
            log::debug!("frame update failed ({} so far): {error:#}", self.suppressed_errors);
        }
    }
}
