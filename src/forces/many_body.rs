use super::quadtree::{Cell, QuadTree};
use super::{Force, separation_direction};
use crate::graph::Node;

/// Maximum quadtree depth; points deeper than this share a leaf
const MAX_TREE_DEPTH: usize = 12;

/// Charge interaction between every pair of nodes.
///
/// Each node's velocity changes by the offset to the other node scaled by
/// `strength * alpha / d²`, as in d3-force; squared distances are clamped to
/// `distance_min²`. Negative strength repels. Pairs are visited in a fixed
/// `(i, j)` order with `i < j`, so the exact path produces identical
/// trajectories run to run.
/// With a `theta` set, distant groups of nodes are collapsed to their center
/// of mass (Barnes-Hut); that path is only behaviorally stable, not bit-exact.
#[derive(Debug, Clone)]
pub struct ManyBodyForce {
    strength: f64,
    distance_min: f64,
    theta: Option<f64>,
}

impl ManyBodyForce {
    pub fn new(strength: f64, distance_min: f64) -> Self {
        Self {
            strength,
            distance_min,
            theta: None,
        }
    }

    /// Approximate with a quadtree when `theta` is `Some`
    pub fn with_theta(mut self, theta: Option<f64>) -> Self {
        self.theta = theta;
        self
    }

    /// Velocity change on a body from a source of the given mass at offset
    /// `(dx, dy)`; points away from the source when strength is negative
    fn pull(&self, dx: f64, dy: f64, mass: f64, alpha: f64) -> (f64, f64) {
        let dist_sq = (dx * dx + dy * dy).max(self.distance_min * self.distance_min);
        let w = self.strength * alpha * mass / dist_sq;
        (w * dx, w * dy)
    }

    fn apply_exact(&self, nodes: &mut [Node], alpha: f64) {
        let n = nodes.len();

        for i in 0..n {
            for j in (i + 1)..n {
                let mut dx = nodes[j].x - nodes[i].x;
                let mut dy = nodes[j].y - nodes[i].y;
                if dx == 0.0 && dy == 0.0 {
                    let (ux, uy) = separation_direction(i, j);
                    dx = ux * self.distance_min;
                    dy = uy * self.distance_min;
                }

                let (fx, fy) = self.pull(dx, dy, 1.0, alpha);

                nodes[i].vx += fx;
                nodes[i].vy += fy;
                nodes[j].vx -= fx;
                nodes[j].vy -= fy;
            }
        }
    }

    fn apply_barnes_hut(&self, nodes: &mut [Node], alpha: f64, theta: f64) {
        let positions: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
        let tree = QuadTree::build(&positions, MAX_TREE_DEPTH);

        let deltas: Vec<(f64, f64)> = (0..positions.len())
            .map(|i| self.accumulate(&tree, tree.root(), i, &positions, alpha, theta))
            .collect();

        for (node, (dvx, dvy)) in nodes.iter_mut().zip(deltas) {
            node.vx += dvx;
            node.vy += dvy;
        }
    }

    fn accumulate(
        &self,
        tree: &QuadTree,
        cell: &Cell,
        i: usize,
        positions: &[(f64, f64)],
        alpha: f64,
        theta: f64,
    ) -> (f64, f64) {
        let (px, py) = positions[i];

        if cell.is_leaf() {
            let mut total = (0.0, 0.0);
            for &j in &cell.points {
                if j == i {
                    continue;
                }
                let (mut dx, mut dy) = (positions[j].0 - px, positions[j].1 - py);
                if dx == 0.0 && dy == 0.0 {
                    let (ux, uy) = separation_direction(i.min(j), i.max(j));
                    let sign = if i < j { 1.0 } else { -1.0 };
                    dx = sign * ux * self.distance_min;
                    dy = sign * uy * self.distance_min;
                }
                let (fx, fy) = self.pull(dx, dy, 1.0, alpha);
                total.0 += fx;
                total.1 += fy;
            }
            return total;
        }

        let (dx, dy) = (cell.center_x - px, cell.center_y - py);
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > 0.0 && cell.width / dist < theta {
            return self.pull(dx, dy, cell.mass, alpha);
        }

        let mut total = (0.0, 0.0);
        for child in cell.children.iter().flatten() {
            let (ax, ay) = self.accumulate(tree, tree.cell(*child), i, positions, alpha, theta);
            total.0 += ax;
            total.1 += ay;
        }
        total
    }
}

impl Force for ManyBodyForce {
    fn apply(&mut self, nodes: &mut [Node], alpha: f64) {
        if nodes.len() < 2 {
            return;
        }
        match self.theta {
            Some(theta) => self.apply_barnes_hut(nodes, alpha, theta),
            None => self.apply_exact(nodes, alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, NodeCategory, NodeSpec};

    fn graph(points: &[(f64, f64)]) -> Graph {
        let nodes: Vec<NodeSpec> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| NodeSpec::new(format!("n{i}"), NodeCategory::Data).at(x, y))
            .collect();
        Graph::build(&nodes, &[], (0.0, 0.0)).unwrap()
    }

    #[test]
    fn negative_strength_repels() {
        let mut g = graph(&[(0.0, 0.0), (10.0, 0.0)]);
        ManyBodyForce::new(-100.0, 1.0).apply(g.nodes_mut(), 1.0);

        // offset 10 scaled by 100 / 10^2, pointing apart
        assert!((g.nodes()[0].vx + 10.0).abs() < 1e-12);
        assert!((g.nodes()[1].vx - 10.0).abs() < 1e-12);
        assert_eq!(g.nodes()[0].vy, 0.0);
    }

    #[test]
    fn scales_with_alpha_and_inverse_distance() {
        let mut near = graph(&[(0.0, 0.0), (10.0, 0.0)]);
        let mut far = graph(&[(0.0, 0.0), (20.0, 0.0)]);
        let mut force = ManyBodyForce::new(-100.0, 1.0);
        force.apply(near.nodes_mut(), 0.5);
        force.apply(far.nodes_mut(), 0.5);

        let ratio = near.nodes()[1].vx / far.nodes()[1].vx;
        assert!((ratio - 2.0).abs() < 1e-9);
        assert!((near.nodes()[1].vx - 5.0).abs() < 1e-12);
    }

    #[test]
    fn coincident_nodes_stay_finite() {
        let mut g = graph(&[(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)]);
        ManyBodyForce::new(-100.0, 1.0).apply(g.nodes_mut(), 1.0);

        for node in g.nodes() {
            assert!(node.vx.is_finite() && node.vy.is_finite());
        }
        assert!(g.nodes()[0].vx != 0.0 || g.nodes()[0].vy != 0.0);
    }

    #[test]
    fn exact_path_is_deterministic() {
        let points = [(0.0, 0.0), (13.0, 4.0), (-7.0, 22.0), (31.0, -9.0)];
        let mut a = graph(&points);
        let mut b = graph(&points);
        ManyBodyForce::new(-100.0, 1.0).apply(a.nodes_mut(), 0.7);
        ManyBodyForce::new(-100.0, 1.0).apply(b.nodes_mut(), 0.7);
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn barnes_hut_approximates_exact() {
        let points: Vec<(f64, f64)> = (0..40)
            .map(|i| {
                let angle = i as f64 * 2.399963;
                let r = 10.0 * (i as f64 + 0.5).sqrt();
                (r * angle.cos(), r * angle.sin())
            })
            .collect();
        let mut exact = graph(&points);
        let mut approx = graph(&points);

        ManyBodyForce::new(-100.0, 1.0).apply(exact.nodes_mut(), 1.0);
        ManyBodyForce::new(-100.0, 1.0)
            .with_theta(Some(0.5))
            .apply(approx.nodes_mut(), 1.0);

        let (mut err, mut mag) = (0.0, 0.0);
        for (e, a) in exact.nodes().iter().zip(approx.nodes()) {
            err += ((e.vx - a.vx).powi(2) + (e.vy - a.vy).powi(2)).sqrt();
            mag += (e.vx.powi(2) + e.vy.powi(2)).sqrt();
        }
        assert!(err < 0.1 * mag, "total error {err} vs magnitude {mag}");
    }

    #[test]
    fn single_node_is_untouched() {
        let mut g = graph(&[(1.0, 2.0)]);
        ManyBodyForce::new(-100.0, 1.0).apply(g.nodes_mut(), 1.0);
        assert_eq!((g.nodes()[0].vx, g.nodes()[0].vy), (0.0, 0.0));
    }
}
