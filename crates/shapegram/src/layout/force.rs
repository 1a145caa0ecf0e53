//! Fruchterman-Reingold placement
//!
//! Nodes repel each other with `k²/d` and edges pull their ends together
//! with `d²/k`, where `k` is the ideal edge length for the box. The step
//! size is capped by a temperature that cools linearly to zero.

use rand::rngs::StdRng;
use rand::Rng;

use super::Point;

/// Smallest distance used in force terms
const MIN_DISTANCE: f64 = 0.01;

pub struct ForcePlacement {
    iterations: usize,
    width: f64,
    height: f64,
}

impl ForcePlacement {
    pub fn new(iterations: usize, width: f64, height: f64) -> Self {
        Self {
            iterations,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Place `node_count` nodes connected by `edges` (pairs of node indices)
    pub fn place(&self, node_count: usize, edges: &[(usize, usize)], rng: &mut StdRng) -> Vec<Point> {
        let mut positions: Vec<Point> = (0..node_count)
            .map(|_| {
                Point::new(
                    rng.random_range(0.0..self.width),
                    rng.random_range(0.0..self.height),
                )
            })
            .collect();
        if node_count < 2 {
            return positions;
        }

        let k = (self.width * self.height / node_count as f64).sqrt();
        let initial_temperature = self.width.min(self.height) / 10.0;

        for iteration in 0..self.iterations {
            let mut displacement = vec![Point::default(); node_count];

            for i in 0..node_count {
                for j in (i + 1)..node_count {
                    let delta = positions[i].sub(positions[j]);
                    let distance = delta.length().max(MIN_DISTANCE);
                    let push = delta.scale(k * k / (distance * distance));
                    displacement[i] = displacement[i].add(push);
                    displacement[j] = displacement[j].sub(push);
                }
            }

            for &(u, v) in edges {
                let delta = positions[u].sub(positions[v]);
                let distance = delta.length().max(MIN_DISTANCE);
                let pull = delta.scale(distance / k);
                displacement[u] = displacement[u].sub(pull);
                displacement[v] = displacement[v].add(pull);
            }

            let temperature =
                initial_temperature * (1.0 - iteration as f64 / self.iterations as f64);
            for (position, shift) in positions.iter_mut().zip(&displacement) {
                let length = shift.length();
                if length < MIN_DISTANCE {
                    continue;
                }
                let step = shift.scale(length.min(temperature) / length);
                let moved = position.add(step);
                *position = Point::new(
                    moved.x.clamp(0.0, self.width),
                    moved.y.clamp(0.0, self.height),
                );
            }
        }
        positions
    }
}
