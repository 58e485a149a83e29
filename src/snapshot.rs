//! Per-tick output handed to renderers

use serde::Serialize;

use crate::graph::Graph;

/// Position of one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Resolved endpoints of one edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSegment {
    pub source: String,
    pub target: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSnapshot {
    /// Ticks run so far
    pub tick: u64,
    /// Alpha after the tick
    pub alpha: f64,
    pub nodes: Vec<NodePosition>,
    pub edges: Vec<EdgeSegment>,
}

impl TickSnapshot {
    /// Copy current positions out of a graph
    pub fn capture(graph: &Graph, tick: u64, alpha: f64) -> Self {
        let nodes = graph.nodes();

        Self {
            tick,
            alpha,
            nodes: nodes
                .iter()
                .map(|n| NodePosition {
                    id: n.id.clone(),
                    x: n.x,
                    y: n.y,
                })
                .collect(),
            edges: graph
                .edges()
                .iter()
                .map(|e| {
                    let (s, t) = (&nodes[e.source], &nodes[e.target]);
                    EdgeSegment {
                        source: s.id.clone(),
                        target: t.id.clone(),
                        x1: s.x,
                        y1: s.y,
                        x2: t.x,
                        y2: t.y,
                    }
                })
                .collect(),
        }
    }

    /// Position of the node with the given id
    pub fn node(&self, id: &str) -> Option<&NodePosition> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeSpec, NodeCategory, NodeSpec};

    #[test]
    fn edges_follow_their_endpoints() {
        let graph = Graph::build(
            &[
                NodeSpec::new("center", NodeCategory::Hub).at(10.0, 20.0),
                NodeSpec::new("data1", NodeCategory::Data).at(-5.5, 4.0),
            ],
            &[EdgeSpec::new("data1", "center")],
            (0.0, 0.0),
        )
        .unwrap();

        let snapshot = TickSnapshot::capture(&graph, 3, 0.5);
        insta::assert_snapshot!(serde_json::to_string_pretty(&snapshot).unwrap(), @r###"
        {
          "tick": 3,
          "alpha": 0.5,
          "nodes": [
            {
              "id": "center",
              "x": 10.0,
              "y": 20.0
            },
            {
              "id": "data1",
              "x": -5.5,
              "y": 4.0
            }
          ],
          "edges": [
            {
              "source": "data1",
              "target": "center",
              "x1": -5.5,
              "y1": 4.0,
              "x2": 10.0,
              "y2": 20.0
            }
          ]
        }
        "###);
    }
}
