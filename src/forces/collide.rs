use super::{Force, separation_direction};
use crate::graph::{Graph, Node};

/// Treats every node as a disk and pushes overlapping disks apart.
///
/// Works on the positions nodes are about to integrate to (`x + vx`), so a
/// resolved overlap is exactly resolved after the integration step. The
/// correction is split by squared radius (the smaller disk moves more);
/// pinned nodes do not move and their partner takes the whole correction.
/// Passes repeat until the worst overlap drops below `tolerance` or the pass
/// budget runs out.
#[derive(Debug, Clone)]
pub struct CollideForce {
    radii: Vec<f64>,
    iterations: usize,
    tolerance: f64,
}

impl CollideForce {
    pub fn new(graph: &Graph, padding: f64, iterations: usize, tolerance: f64) -> Self {
        Self {
            radii: graph.nodes().iter().map(|n| n.radius() + padding).collect(),
            iterations: iterations.max(1),
            tolerance,
        }
    }

    /// Collision radius of the node at `index`
    pub fn radius(&self, index: usize) -> f64 {
        self.radii[index]
    }

    /// One relaxation pass, returning the deepest overlap it found
    fn relax(&self, nodes: &mut [Node]) -> f64 {
        let mut worst: f64 = 0.0;
        let n = nodes.len();

        for i in 0..n {
            for j in (i + 1)..n {
                let (pinned_i, pinned_j) = (nodes[i].is_pinned(), nodes[j].is_pinned());
                if pinned_i && pinned_j {
                    continue;
                }

                let (xi, yi) = predicted(&nodes[i]);
                let (xj, yj) = predicted(&nodes[j]);
                let (ri, rj) = (self.radii[i], self.radii[j]);
                let r = ri + rj;

                let (dx, dy) = (xj - xi, yj - yi);
                let dist_sq = dx * dx + dy * dy;
                if dist_sq >= r * r {
                    continue;
                }

                let dist = dist_sq.sqrt();
                let (ux, uy) = if dist > 0.0 {
                    (dx / dist, dy / dist)
                } else {
                    separation_direction(i, j)
                };
                let overlap = r - dist;
                worst = worst.max(overlap);

                let (wi, wj) = match (pinned_i, pinned_j) {
                    (true, _) => (0.0, 1.0),
                    (_, true) => (1.0, 0.0),
                    _ => {
                        let share = rj * rj / (ri * ri + rj * rj);
                        (share, 1.0 - share)
                    }
                };

                nodes[i].vx -= ux * overlap * wi;
                nodes[i].vy -= uy * overlap * wi;
                nodes[j].vx += ux * overlap * wj;
                nodes[j].vy += uy * overlap * wj;
            }
        }

        worst
    }
}

fn predicted(node: &Node) -> (f64, f64) {
    match (node.fx, node.fy) {
        (Some(fx), Some(fy)) => (fx, fy),
        _ => (node.x + node.vx, node.y + node.vy),
    }
}

impl Force for CollideForce {
    fn apply(&mut self, nodes: &mut [Node], _alpha: f64) {
        for _ in 0..self.iterations {
            if self.relax(nodes) < self.tolerance {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutOptions;
    use crate::graph::{NodeCategory, NodeSpec};

    fn graph(points: &[(f64, f64)]) -> Graph {
        let nodes: Vec<NodeSpec> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| NodeSpec::new(format!("n{i}"), NodeCategory::Data).at(x, y))
            .collect();
        Graph::build(&nodes, &[], (0.0, 0.0)).unwrap()
    }

    /// Apply the force, then move nodes the way the integrator does
    fn resolve(graph: &mut Graph, force: &mut CollideForce) {
        force.apply(graph.nodes_mut(), 1.0);
        for node in graph.nodes_mut() {
            if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
                node.x = fx;
                node.y = fy;
            } else {
                node.x += node.vx;
                node.y += node.vy;
            }
        }
    }

    fn min_gap(graph: &Graph, force: &CollideForce) -> f64 {
        let nodes = graph.nodes();
        let mut gap = f64::MAX;
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let d = ((nodes[j].x - nodes[i].x).powi(2) + (nodes[j].y - nodes[i].y).powi(2))
                    .sqrt();
                gap = gap.min(d - (force.radius(i) + force.radius(j)));
            }
        }
        gap
    }

    #[test]
    fn separates_two_overlapping_nodes_in_one_pass() {
        let mut g = graph(&[(0.0, 0.0), (2.0, 0.0)]);
        let mut force = CollideForce::new(&g, 0.0, 1, 0.01);
        resolve(&mut g, &mut force);

        assert!(min_gap(&g, &force) > -1e-9);
        // equal radii: both move the same amount
        assert!((g.nodes()[0].x + 7.0).abs() < 1e-9);
        assert!((g.nodes()[1].x - 9.0).abs() < 1e-9);
    }

    /// Collision force configured exactly as a default layout configures it
    fn default_force(graph: &Graph) -> (CollideForce, f64) {
        let options = LayoutOptions::default();
        let force = CollideForce::new(
            graph,
            options.collision_padding,
            options.collision_iterations,
            options.collision_tolerance,
        );
        (force, options.collision_tolerance)
    }

    #[test]
    fn separates_three_collinear_nodes_with_defaults() {
        let mut g = graph(&[(0.0, 0.0), (4.0, 0.0), (8.0, 0.0)]);
        let (mut force, tolerance) = default_force(&g);
        resolve(&mut g, &mut force);

        let gap = min_gap(&g, &force);
        assert!(gap > -tolerance, "gap {gap}");
    }

    #[test]
    fn separates_four_clustered_nodes_with_defaults() {
        let mut g = graph(&[(0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (3.0, 3.0)]);
        let (mut force, tolerance) = default_force(&g);
        resolve(&mut g, &mut force);

        let gap = min_gap(&g, &force);
        assert!(gap > -tolerance, "gap {gap}");
    }

    #[test]
    fn coincident_nodes_are_separated() {
        let mut g = graph(&[(5.0, 5.0), (5.0, 5.0)]);
        let mut force = CollideForce::new(&g, 0.0, 1, 0.01);
        resolve(&mut g, &mut force);

        assert!(min_gap(&g, &force) > -1e-9);
    }

    #[test]
    fn pinned_node_does_not_move() {
        let mut g = graph(&[(0.0, 0.0), (4.0, 0.0)]);
        g.node_mut(0).unwrap().pin(0.0, 0.0);
        let mut force = CollideForce::new(&g, 0.0, 1, 0.01);
        resolve(&mut g, &mut force);

        assert_eq!((g.nodes()[0].x, g.nodes()[0].y), (0.0, 0.0));
        assert!((g.nodes()[1].x - 16.0).abs() < 1e-9);
    }

    #[test]
    fn padding_widens_disks() {
        let g = graph(&[(0.0, 0.0)]);
        let force = CollideForce::new(&g, 2.0, 1, 0.01);
        assert_eq!(force.radius(0), 10.0);
    }

    #[test]
    fn separated_nodes_are_untouched() {
        let mut g = graph(&[(0.0, 0.0), (40.0, 0.0)]);
        let mut force = CollideForce::new(&g, 0.0, 4, 0.01);
        force.apply(g.nodes_mut(), 1.0);
        assert_eq!(g.nodes()[0].vx, 0.0);
        assert_eq!(g.nodes()[1].vx, 0.0);
    }
}
