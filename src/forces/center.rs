use super::Force;
use crate::graph::Node;

/// Centering force toward a fixed point.
///
/// Every node receives the same velocity change, proportional to the offset
/// of the centroid from the target, so the layout drifts as a whole without
/// distorting its shape.
#[derive(Debug, Clone)]
pub struct CenterForce {
    x: f64,
    y: f64,
    strength: f64,
}

impl CenterForce {
    pub fn new(center: (f64, f64), strength: f64) -> Self {
        Self {
            x: center.0,
            y: center.1,
            strength,
        }
    }
}

impl Force for CenterForce {
    fn apply(&mut self, nodes: &mut [Node], alpha: f64) {
        if nodes.is_empty() {
            return;
        }

        let n = nodes.len() as f64;
        let (sx, sy) = nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));

        let k = self.strength * alpha;
        let dvx = (self.x - sx / n) * k;
        let dvy = (self.y - sy / n) * k;

        for node in nodes {
            node.vx += dvx;
            node.vy += dvy;
        }
    }
}
