mod animation;
mod node;
mod scene;
mod settings;
mod surface;

use glam::DVec2;
use serde::Deserialize;

pub use animation::{Animation, PlayState};
pub use node::Node;
pub use scene::{Frame, Scene};
pub use settings::{MeshSettings, NODE_COUNT_RANGE, SPEED_RANGE};
pub use surface::{Surface, SurfaceSync, VisualId};

/// Drawable area in canvas coordinates, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Where a node counts as gone and where it re-enters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// The dot's box must stay fully inside the canvas and resets land flush
    /// against the inner side of an edge.
    #[default]
    Inset,
    /// The dot may drift one diameter past the edge; resets land just
    /// outside it.
    Overshoot,
}

impl BoundaryPolicy {
    pub fn is_outside(self, position: DVec2, diameter: f64, canvas: Canvas) -> bool {
        match self {
            Self::Inset => {
                position.x < 0.0
                    || position.y < 0.0
                    || position.x > canvas.width - diameter
                    || position.y > canvas.height - diameter
            }
            Self::Overshoot => {
                position.x < -diameter
                    || position.x > canvas.width
                    || position.y < -diameter
                    || position.y > canvas.height
            }
        }
    }
}
