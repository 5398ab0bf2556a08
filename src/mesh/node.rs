use glam::{DVec2, Vec2};
use rand::Rng;

use super::{BoundaryPolicy, Canvas};

const DIRECTION_LIMIT: i32 = 32;

/// A drifting point of the mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub position: DVec2,
    pub direction: Vec2,
    pub velocity: f64,
    pub diameter: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    fn sample(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..4) {
            0 => Self::Left,
            1 => Self::Top,
            2 => Self::Right,
            _ => Self::Bottom,
        }
    }
}

fn sample_velocity(rng: &mut impl Rng) -> f64 {
    rng.random::<f64>() * 2.0 + 1.0
}

fn sample_diameter(rng: &mut impl Rng) -> f64 {
    rng.random::<f64>() * 2.0 + 4.0
}

/// Draws integer direction components until the heading is non-zero.
fn sample_direction(rng: &mut impl Rng, x_range: (i32, i32), y_range: (i32, i32)) -> Vec2 {
    loop {
        let x = rng.random_range(x_range.0..=x_range.1);
        let y = rng.random_range(y_range.0..=y_range.1);
        if x != 0 || y != 0 {
            return Vec2::new(x as f32, y as f32);
        }
    }
}

impl Node {
    pub fn new(canvas: Canvas, rng: &mut impl Rng) -> Self {
        let position = DVec2::new(
            rng.random::<f64>() * canvas.width,
            rng.random::<f64>() * canvas.height,
        );
        let full = (-DIRECTION_LIMIT, DIRECTION_LIMIT);

        Self {
            position,
            direction: sample_direction(rng, full, full),
            velocity: sample_velocity(rng),
            diameter: sample_diameter(rng),
        }
    }

    /// Moves the node by `delta_time` and resets it onto an edge once it
    /// leaves the canvas. Returns `true` when a reset happened.
    pub fn update(
        &mut self,
        delta_time: f64,
        canvas: Canvas,
        policy: BoundaryPolicy,
        rng: &mut impl Rng,
    ) -> bool {
        let heading = self.direction.normalize_or_zero().as_dvec2();
        self.position += heading * (self.velocity * delta_time);

        if policy.is_outside(self.position, self.diameter, canvas) {
            self.reset_mechanics(canvas, policy, rng);
            return true;
        }

        false
    }

    pub fn reset_mechanics(&mut self, canvas: Canvas, policy: BoundaryPolicy, rng: &mut impl Rng) {
        self.velocity = sample_velocity(rng);
        self.diameter = sample_diameter(rng);

        let diameter = self.diameter;
        let along_x = rng.random::<f64>() * (canvas.width - diameter).max(0.0);
        let along_y = rng.random::<f64>() * (canvas.height - diameter).max(0.0);
        let (near, far_x, far_y) = match policy {
            BoundaryPolicy::Inset => (
                0.0,
                (canvas.width - diameter).max(0.0),
                (canvas.height - diameter).max(0.0),
            ),
            BoundaryPolicy::Overshoot => (-diameter, canvas.width, canvas.height),
        };

        let full = (-DIRECTION_LIMIT, DIRECTION_LIMIT);
        let inward = (0, DIRECTION_LIMIT);
        let outward = (-DIRECTION_LIMIT, -1);

        let (position, direction) = match Edge::sample(rng) {
            Edge::Left => (DVec2::new(near, along_y), sample_direction(rng, inward, full)),
            Edge::Top => (DVec2::new(along_x, near), sample_direction(rng, full, inward)),
            Edge::Right => (DVec2::new(far_x, along_y), sample_direction(rng, outward, full)),
            Edge::Bottom => (DVec2::new(along_x, far_y), sample_direction(rng, full, outward)),
        };

        self.position = position;
        self.direction = direction;
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        self.position.distance(other.position)
    }

    pub fn center(&self) -> DVec2 {
        self.position + DVec2::splat(self.diameter / 2.0)
    }
}
