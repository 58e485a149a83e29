use super::Force;
use crate::graph::{Graph, Node};

#[derive(Debug, Clone, Copy)]
struct Link {
    source: usize,
    target: usize,
    /// Spring constant, `1 / mean(degree(source), degree(target))`
    strength: f64,
}

/// Spring force pulling linked nodes toward a rest distance.
///
/// Well-connected nodes get weaker springs per edge so a hub is not yanked
/// around by its many neighbors. The adjustment is split evenly: source and
/// target always receive equal and opposite velocity changes.
#[derive(Debug, Clone)]
pub struct LinkForce {
    links: Vec<Link>,
    distance: f64,
}

impl LinkForce {
    pub fn new(graph: &Graph, distance: f64) -> Self {
        let links = graph
            .edges()
            .iter()
            .filter(|e| e.source != e.target)
            .map(|e| {
                let mean_degree = (graph.degree(e.source) + graph.degree(e.target)) as f64 / 2.0;
                Link {
                    source: e.source,
                    target: e.target,
                    strength: 1.0 / mean_degree.max(1.0),
                }
            })
            .collect();

        Self { links, distance }
    }
}

impl Force for LinkForce {
    fn apply(&mut self, nodes: &mut [Node], alpha: f64) {
        for link in &self.links {
            let (s, t) = (&nodes[link.source], &nodes[link.target]);

            // Hooke's law on the positions the nodes are about to reach
            let dx = (t.x + t.vx) - (s.x + s.vx);
            let dy = (t.y + t.vy) - (s.y + s.vy);
            let dist = (dx * dx + dy * dy).sqrt();
            if dist == 0.0 {
                continue;
            }

            let k = (dist - self.distance) / dist * alpha * link.strength * 0.5;
            let (ax, ay) = (dx * k, dy * k);

            nodes[link.source].vx += ax;
            nodes[link.source].vy += ay;
            nodes[link.target].vx -= ax;
            nodes[link.target].vy -= ay;
        }
    }
}
