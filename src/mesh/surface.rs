use std::collections::HashSet;

use anyhow::Result;

use super::Frame;
use super::scene::{ConnectorState, DotState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualId {
    Dot(usize),
    Line(usize, usize),
}

/// Retained-mode drawing target the animation pushes its frames into.
pub trait Surface {
    fn add_visual(&mut self, id: VisualId) -> Result<()>;
    fn remove_visual(&mut self, id: VisualId) -> Result<()>;
    fn set_position(&mut self, id: VisualId, x: f64, y: f64) -> Result<()>;
    fn set_size(&mut self, id: VisualId, diameter: f64) -> Result<()>;
    fn set_line_endpoints(
        &mut self,
        id: VisualId,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> Result<()>;
    fn set_opacity(&mut self, id: VisualId, value: f64) -> Result<()>;
    fn clear(&mut self);
}

/// Tracks which visuals exist on a surface so frames can be applied as
/// diffs: dots are created eagerly, lines only while their pair is
/// connected.
#[derive(Debug, Default)]
pub struct SurfaceSync {
    dot_count: usize,
    lines: HashSet<(usize, usize)>,
}

/// First failure of a batch plus how many elements failed in total.
#[derive(Default)]
struct Failures {
    first: Option<anyhow::Error>,
    count: usize,
}

impl Failures {
    fn record(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(error) => {
                self.count += 1;
                self.first.get_or_insert(error);
                false
            }
        }
    }

    fn finish(self) -> Result<()> {
        match self.first {
            None => Ok(()),
            Some(error) if self.count == 1 => Err(error),
            Some(error) => Err(error.context(format!("{} visual updates failed", self.count))),
        }
    }
}

fn place_dot(surface: &mut impl Surface, dot: &DotState) -> Result<()> {
    let id = VisualId::Dot(dot.index);
    surface.set_position(id, dot.position.x, dot.position.y)?;
    surface.set_size(id, dot.diameter)?;
    surface.set_opacity(id, dot.diameter / 6.0)
}

fn shape_line(surface: &mut impl Surface, id: VisualId, connector: &ConnectorState) -> Result<()> {
    let (from, to) = (connector.from, connector.to);
    surface.set_line_endpoints(id, from.x, from.y, to.x, to.y)?;
    surface.set_opacity(id, connector.opacity)
}

impl SurfaceSync {
    pub fn dot_count(&self) -> usize {
        self.dot_count
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn rebuild(&mut self, surface: &mut impl Surface, node_count: usize) -> Result<()> {
        surface.clear();
        self.lines.clear();
        self.dot_count = 0;

        let mut failures = Failures::default();
        for index in 0..node_count {
            if failures.record(surface.add_visual(VisualId::Dot(index))) {
                self.dot_count += 1;
            }
        }

        failures.finish()
    }

    /// Applies every element of `frame`; a failed element does not stop the
    /// rest. A line is tracked from a successful add until a successful remove.
    pub fn apply(&mut self, frame: &Frame, surface: &mut impl Surface) -> Result<()> {
        let mut failures = Failures::default();
        for dot in &frame.dots {
            failures.record(place_dot(surface, dot));
        }

        let mut shown = HashSet::with_capacity(frame.connectors.len());
        for connector in &frame.connectors {
            let (i, j) = connector.pair;
            let id = VisualId::Line(i, j);
            if !self.lines.contains(&connector.pair) {
                if !failures.record(surface.add_visual(id)) {
                    continue;
                }
                self.lines.insert(connector.pair);
            }

            failures.record(shape_line(surface, id, connector));
            shown.insert(connector.pair);
        }

        let hidden = self
            .lines
            .iter()
            .filter(|pair| !shown.contains(*pair))
            .copied()
            .collect::<Vec<_>>();
        for pair in hidden {
            if failures.record(surface.remove_visual(VisualId::Line(pair.0, pair.1))) {
                self.lines.remove(&pair);
            }
        }

        failures.finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use anyhow::{anyhow, bail};
    use glam::DVec2;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::mesh::{BoundaryPolicy, Canvas, Scene};

    /// Keeps the last opacity per visual and rejects calls for unknown ids.
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) visuals: HashMap<VisualId, f64>,
        pub(crate) max_lines: usize,
    }

    impl RecordingSurface {
        pub(crate) fn dots(&self) -> usize {
            self.visuals
                .keys()
                .filter(|id| matches!(id, VisualId::Dot(_)))
                .count()
        }

        pub(crate) fn lines(&self) -> usize {
            self.visuals.len() - self.dots()
        }

        fn known(&mut self, id: VisualId) -> Result<&mut f64> {
            self.visuals
                .get_mut(&id)
                .ok_or_else(|| anyhow!("unknown visual {id:?}"))
        }
    }

    impl Surface for RecordingSurface {
        fn add_visual(&mut self, id: VisualId) -> Result<()> {
            if self.visuals.insert(id, 0.0).is_some() {
                bail!("duplicate visual {id:?}");
            }
            self.max_lines = self.max_lines.max(self.lines());
            Ok(())
        }

        fn remove_visual(&mut self, id: VisualId) -> Result<()> {
            self.visuals
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| anyhow!("unknown visual {id:?}"))
        }

        fn set_position(&mut self, id: VisualId, _x: f64, _y: f64) -> Result<()> {
            self.known(id).map(|_| ())
        }

        fn set_size(&mut self, id: VisualId, _diameter: f64) -> Result<()> {
            self.known(id).map(|_| ())
        }

        fn set_line_endpoints(
            &mut self,
            id: VisualId,
            _x1: f64,
            _y1: f64,
            _x2: f64,
            _y2: f64,
        ) -> Result<()> {
            self.known(id).map(|_| ())
        }

        fn set_opacity(&mut self, id: VisualId, value: f64) -> Result<()> {
            *self.known(id)? = value;
            Ok(())
        }

        fn clear(&mut self) {
            self.visuals.clear();
        }
    }

    #[test]
    fn test_visual_counts_stay_bounded() {
        let mut scene = Scene::new(
            Canvas::new(700.0, 500.0),
            BoundaryPolicy::Overshoot,
            SmallRng::seed_from_u64(8),
        );
        let mut surface = RecordingSurface::default();
        let mut sync = SurfaceSync::default();

        for count in [16, 5, 40] {
            scene.set_node_count(count);
            sync.rebuild(&mut surface, count).unwrap();
            assert_eq!(surface.dots(), count);
            assert_eq!(surface.lines(), 0);

            surface.max_lines = 0;
            for _ in 0..100 {
                let frame = scene.tick(3.0);
                sync.apply(&frame, &mut surface).unwrap();

                assert_eq!(surface.dots(), count);
                assert_eq!(surface.lines(), frame.connectors.len());
                assert_eq!(sync.line_count(), surface.lines());
            }
            assert!(surface.max_lines <= count * (count - 1) / 2);
        }
    }

    #[test]
    fn test_dot_opacity_tracks_diameter() {
        let mut scene = Scene::new(
            Canvas::new(300.0, 300.0),
            BoundaryPolicy::Inset,
            SmallRng::seed_from_u64(21),
        );
        scene.set_node_count(3);
        let mut surface = RecordingSurface::default();
        let mut sync = SurfaceSync::default();
        sync.rebuild(&mut surface, 3).unwrap();

        sync.apply(&scene.snapshot(), &mut surface).unwrap();

        for (index, node) in scene.nodes().iter().enumerate() {
            assert_eq!(surface.visuals[&VisualId::Dot(index)], node.diameter / 6.0);
        }
    }

    #[test]
    fn test_apply_before_rebuild_fails() {
        let mut scene = Scene::new(
            Canvas::new(300.0, 300.0),
            BoundaryPolicy::Inset,
            SmallRng::seed_from_u64(4),
        );
        scene.set_node_count(2);
        let mut surface = RecordingSurface::default();

        let result = SurfaceSync::default().apply(&scene.snapshot(), &mut surface);
        assert!(result.is_err());
    }

    /// Wraps a recording surface and fails selected calls.
    #[derive(Default)]
    struct FlakySurface {
        inner: RecordingSurface,
        failing_removals: usize,
        broken_dot: Option<usize>,
    }

    impl Surface for FlakySurface {
        fn add_visual(&mut self, id: VisualId) -> Result<()> {
            self.inner.add_visual(id)
        }

        fn remove_visual(&mut self, id: VisualId) -> Result<()> {
            if self.failing_removals > 0 {
                self.failing_removals -= 1;
                bail!("surface busy, cannot remove {id:?}");
            }
            self.inner.remove_visual(id)
        }

        fn set_position(&mut self, id: VisualId, x: f64, y: f64) -> Result<()> {
            if self.broken_dot.is_some_and(|index| id == VisualId::Dot(index)) {
                bail!("cannot move {id:?}");
            }
            self.inner.set_position(id, x, y)
        }

        fn set_size(&mut self, id: VisualId, diameter: f64) -> Result<()> {
            self.inner.set_size(id, diameter)
        }

        fn set_line_endpoints(
            &mut self,
            id: VisualId,
            x1: f64,
            y1: f64,
            x2: f64,
            y2: f64,
        ) -> Result<()> {
            self.inner.set_line_endpoints(id, x1, y1, x2, y2)
        }

        fn set_opacity(&mut self, id: VisualId, value: f64) -> Result<()> {
            self.inner.set_opacity(id, value)
        }

        fn clear(&mut self) {
            self.inner.clear();
        }
    }

    fn two_dot_frame(connected: bool) -> Frame {
        let dots = vec![
            DotState {
                index: 0,
                position: DVec2::new(10.0, 10.0),
                diameter: 4.8,
            },
            DotState {
                index: 1,
                position: DVec2::new(50.0, 10.0),
                diameter: 5.4,
            },
        ];
        let connectors = if connected {
            vec![ConnectorState {
                pair: (0, 1),
                from: DVec2::new(12.4, 12.4),
                to: DVec2::new(52.7, 12.7),
                opacity: 0.5,
            }]
        } else {
            Vec::new()
        };

        Frame {
            dots,
            connectors,
            resets: 0,
        }
    }

    #[test]
    fn test_failed_removal_is_retried() {
        let mut surface = FlakySurface::default();
        let mut sync = SurfaceSync::default();
        sync.rebuild(&mut surface, 2).unwrap();
        sync.apply(&two_dot_frame(true), &mut surface).unwrap();

        surface.failing_removals = 1;
        assert!(sync.apply(&two_dot_frame(false), &mut surface).is_err());
        assert_eq!(surface.inner.lines(), 1);
        assert_eq!(sync.line_count(), 1);

        for _ in 0..3 {
            sync.apply(&two_dot_frame(true), &mut surface).unwrap();
            assert_eq!(surface.inner.lines(), 1);
            assert_eq!(surface.inner.visuals[&VisualId::Line(0, 1)], 0.5);
        }

        sync.apply(&two_dot_frame(false), &mut surface).unwrap();
        assert_eq!(surface.inner.lines(), 0);
        assert_eq!(sync.line_count(), 0);
    }

    #[test]
    fn test_broken_dot_does_not_block_rest_of_frame() {
        let mut surface = FlakySurface {
            broken_dot: Some(0),
            ..FlakySurface::default()
        };
        let mut sync = SurfaceSync::default();
        sync.rebuild(&mut surface, 2).unwrap();

        let error = sync.apply(&two_dot_frame(true), &mut surface).unwrap_err();
        assert!(error.to_string().contains("Dot(0)"));

        assert_eq!(surface.inner.visuals[&VisualId::Dot(1)], 5.4 / 6.0);
        assert_eq!(surface.inner.visuals[&VisualId::Line(0, 1)], 0.5);
        assert_eq!(sync.line_count(), 1);
    }

    #[test]
    fn test_rebuild_counts_only_accepted_dots() {
        let mut surface = RecordingSurface::default();
        surface.add_visual(VisualId::Dot(7)).unwrap();
        let mut sync = SurfaceSync::default();

        sync.rebuild(&mut surface, 3).unwrap();
        assert_eq!(sync.dot_count(), 3);
        assert_eq!(surface.dots(), 3);

        let mut broken = crate::mesh::animation::tests::BrokenSurface;
        assert!(sync.rebuild(&mut broken, 3).is_err());
        assert_eq!(sync.dot_count(), 0);
        assert_eq!(sync.line_count(), 0);
    }
}
