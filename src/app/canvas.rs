use std::collections::HashMap;

use anyhow::{Result, anyhow, bail};
use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, vec2};

use crate::mesh::{Surface, VisualId};

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const LINE_WIDTH: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
enum Visual {
    Dot {
        position: (f64, f64),
        diameter: f64,
        opacity: f32,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        opacity: f32,
    },
}

impl Visual {
    fn for_id(id: VisualId) -> Self {
        match id {
            VisualId::Dot(_) => Self::Dot {
                position: (0.0, 0.0),
                diameter: 0.0,
                opacity: 1.0,
            },
            VisualId::Line(..) => Self::Line {
                from: (0.0, 0.0),
                to: (0.0, 0.0),
                opacity: 0.0,
            },
        }
    }
}

/// Shapes kept between frames and painted into the central panel.
#[derive(Default)]
pub(super) struct RetainedCanvas {
    visuals: HashMap<VisualId, Visual>,
}

impl RetainedCanvas {
    fn visual_mut(&mut self, id: VisualId) -> Result<&mut Visual> {
        self.visuals
            .get_mut(&id)
            .ok_or_else(|| anyhow!("no visual registered for {id:?}"))
    }

    pub(super) fn paint(&self, painter: &Painter, rect: Rect, color: Color32) {
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let to_screen = |(x, y): (f64, f64)| rect.min + vec2(x as f32, y as f32);

        for visual in self.visuals.values() {
            if let Visual::Line { from, to, opacity } = *visual {
                painter.line_segment(
                    [to_screen(from), to_screen(to)],
                    Stroke::new(LINE_WIDTH, color.gamma_multiply(opacity)),
                );
            }
        }

        for visual in self.visuals.values() {
            if let Visual::Dot {
                position,
                diameter,
                opacity,
            } = *visual
            {
                let radius = (diameter / 2.0) as f32;
                let center: Pos2 = to_screen(position) + vec2(radius, radius);
                painter.circle_filled(center, radius, color.gamma_multiply(opacity));
            }
        }
    }
}

impl Surface for RetainedCanvas {
    fn add_visual(&mut self, id: VisualId) -> Result<()> {
        if self.visuals.insert(id, Visual::for_id(id)).is_some() {
            bail!("visual {id:?} already exists");
        }
        Ok(())
    }

    fn remove_visual(&mut self, id: VisualId) -> Result<()> {
        self.visuals
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("cannot remove missing visual {id:?}"))
    }

    fn set_position(&mut self, id: VisualId, x: f64, y: f64) -> Result<()> {
        match self.visual_mut(id)? {
            Visual::Dot { position, .. } => *position = (x, y),
            Visual::Line { .. } => bail!("line {id:?} has endpoints, not a position"),
        }
        Ok(())
    }

    fn set_size(&mut self, id: VisualId, value: f64) -> Result<()> {
        match self.visual_mut(id)? {
            Visual::Dot { diameter, .. } => *diameter = value,
            Visual::Line { .. } => bail!("line {id:?} has no size"),
        }
        Ok(())
    }

    fn set_line_endpoints(
        &mut self,
        id: VisualId,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> Result<()> {
        match self.visual_mut(id)? {
            Visual::Line { from, to, .. } => {
                *from = (x1, y1);
                *to = (x2, y2);
            }
            Visual::Dot { .. } => bail!("dot {id:?} has no endpoints"),
        }
        Ok(())
    }

    fn set_opacity(&mut self, id: VisualId, value: f64) -> Result<()> {
        let clamped = value.clamp(0.0, 1.0) as f32;
        match self.visual_mut(id)? {
            Visual::Dot { opacity, .. } | Visual::Line { opacity, .. } => *opacity = clamped,
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.visuals.clear();
    }
}
