use glam::DVec2;
use rand::Rng;

use super::{BoundaryPolicy, Canvas, Node};

const CONNECT_DISTANCE: f64 = 360.0;
const OPACITY_NUMERATOR: f64 = 48.0;
const OPACITY_OFFSET: f64 = 0.1;

/// Unclamped line opacity for two nodes `distance` apart, or `None` when the
/// pair is not connected.
pub fn connector_opacity(distance: f64) -> Option<f64> {
    if distance > 0.0 && distance <= CONNECT_DISTANCE {
        Some(OPACITY_NUMERATOR / distance - OPACITY_OFFSET)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DotState {
    pub index: usize,
    pub position: DVec2,
    pub diameter: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorState {
    pub pair: (usize, usize),
    pub from: DVec2,
    pub to: DVec2,
    pub opacity: f64,
}

/// Everything the surface needs for one tick. Pairs missing from
/// `connectors` are hidden.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub dots: Vec<DotState>,
    pub connectors: Vec<ConnectorState>,
    pub resets: usize,
}

pub struct Scene<R> {
    canvas: Canvas,
    policy: BoundaryPolicy,
    nodes: Vec<Node>,
    rng: R,
}

impl<R: Rng> Scene<R> {
    pub fn new(canvas: Canvas, policy: BoundaryPolicy, rng: R) -> Self {
        Self {
            canvas,
            policy,
            nodes: Vec::new(),
            rng,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    #[cfg(test)]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Replaces the whole collection with `count` fresh nodes.
    pub fn set_node_count(&mut self, count: usize) {
        let canvas = self.canvas;
        let rng = &mut self.rng;
        self.nodes.clear();
        self.nodes.extend((0..count).map(|_| Node::new(canvas, &mut *rng)));
    }

    pub fn tick(&mut self, delta_time: f64) -> Frame {
        let canvas = self.canvas;
        let policy = self.policy;
        let mut resets = 0;
        for node in &mut self.nodes {
            if node.update(delta_time, canvas, policy, &mut self.rng) {
                resets += 1;
                log::trace!("node reset to ({:.1}, {:.1})", node.position.x, node.position.y);
            }
        }

        Frame {
            dots: self.dots(),
            connectors: self.connectors(),
            resets,
        }
    }

    /// Current state without advancing, used right after a rebuild.
    pub fn snapshot(&self) -> Frame {
        Frame {
            dots: self.dots(),
            connectors: self.connectors(),
            resets: 0,
        }
    }

    fn dots(&self) -> Vec<DotState> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| DotState {
                index,
                position: node.position,
                diameter: node.diameter,
            })
            .collect()
    }

    fn connectors(&self) -> Vec<ConnectorState> {
        let mut connectors = Vec::new();
        for (i, current) in self.nodes.iter().enumerate() {
            for (j, passing) in self.nodes.iter().enumerate().skip(i + 1) {
                let Some(opacity) = connector_opacity(current.distance_to(passing)) else {
                    continue;
                };

                connectors.push(ConnectorState {
                    pair: (i, j),
                    from: current.center(),
                    to: passing.center(),
                    opacity,
                });
            }
        }
        connectors
    }
}
