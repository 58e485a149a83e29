//! Graph model: nodes, edges and id resolution
//!
//! Input arrives as [`NodeSpec`]/[`EdgeSpec`] records that name nodes by id.
//! [`Graph::build`] resolves every edge to node indices once, so forces never
//! look anything up by string while the simulation runs.

use std::collections::HashMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Radius of a hub node
pub const HUB_RADIUS: f64 = 15.0;

/// Radius of every other node
pub const LEAF_RADIUS: f64 = 8.0;

/// Radius of the innermost ring of the initial spiral
const INITIAL_RADIUS: f64 = 10.0;

/// Node category. Determines radius, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Hub,
    #[default]
    Data,
    Insight,
}

impl NodeCategory {
    /// Visual and collision radius for this category
    pub fn radius(&self) -> f64 {
        match self {
            NodeCategory::Hub => HUB_RADIUS,
            NodeCategory::Data | NodeCategory::Insight => LEAF_RADIUS,
        }
    }
}

/// A node as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique identifier
    pub id: String,

    /// Category, also accepted under the key `type`
    #[serde(default, alias = "type")]
    pub category: NodeCategory,

    /// Optional start position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, category: NodeCategory) -> Self {
        Self {
            id: id.into(),
            category,
            x: None,
            y: None,
        }
    }

    /// Start the node at a fixed position instead of the spiral
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }
}

/// An edge as supplied by the caller, naming its endpoints by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,
}

impl EdgeSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A node with position and velocity for simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node ID (from NodeSpec)
    pub id: String,
    pub category: NodeCategory,
    /// Position
    pub x: f64,
    pub y: f64,
    /// Velocity
    pub vx: f64,
    pub vy: f64,
    /// Pinned position; while set the integrator holds the node here
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

impl Node {
    fn from_spec(spec: &NodeSpec, index: usize, center: (f64, f64)) -> Self {
        let (x, y) = match (spec.x, spec.y) {
            (Some(x), Some(y)) => (x, y),
            _ => spiral_position(index, center),
        };

        Self {
            id: spec.id.clone(),
            category: spec.category,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            fx: None,
            fy: None,
        }
    }

    pub fn radius(&self) -> f64 {
        self.category.radius()
    }

    /// Whether the node is held at a pinned position
    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() && self.fy.is_some()
    }

    pub fn pin(&mut self, x: f64, y: f64) {
        self.fx = Some(x);
        self.fy = Some(y);
    }

    pub fn unpin(&mut self) {
        self.fx = None;
        self.fy = None;
    }
}

/// Phyllotaxis placement used for nodes without a start position.
///
/// Consecutive nodes are a golden angle apart on a slowly widening spiral, so
/// the initial layout is deterministic and has no coincident nodes.
fn spiral_position(index: usize, center: (f64, f64)) -> (f64, f64) {
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
    let angle = index as f64 * golden_angle;
    (
        center.0 + radius * angle.cos(),
        center.1 + radius * angle.sin(),
    )
}

/// An edge for simulation (indices into node array)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
}

/// Nodes and resolved edges
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    degrees: Vec<usize>,
    node_id_to_index: HashMap<String, usize>,
}

impl Graph {
    /// Resolve node and edge specs into a graph.
    ///
    /// Nodes without a start position are laid out on a spiral around
    /// `center`. Fails if two nodes share an id or an edge names a node that
    /// does not exist.
    pub fn build(nodes: &[NodeSpec], edges: &[EdgeSpec], center: (f64, f64)) -> Result<Self> {
        let mut node_id_to_index = HashMap::with_capacity(nodes.len());
        for (i, spec) in nodes.iter().enumerate() {
            if node_id_to_index.insert(spec.id.clone(), i).is_some() {
                return Err(LayoutError::DuplicateNode(spec.id.clone()));
            }
        }

        let resolve = |edge: usize, id: &str| {
            node_id_to_index
                .get(id)
                .copied()
                .ok_or_else(|| LayoutError::InvalidReference {
                    edge,
                    id: id.to_string(),
                })
        };

        let edges = edges
            .iter()
            .enumerate()
            .map(|(i, e)| {
                Ok(Edge {
                    source: resolve(i, &e.source)?,
                    target: resolve(i, &e.target)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut degrees = vec![0; nodes.len()];
        for edge in &edges {
            degrees[edge.source] += 1;
            degrees[edge.target] += 1;
        }

        let nodes = nodes
            .iter()
            .enumerate()
            .map(|(i, spec)| Node::from_spec(spec, i, center))
            .collect();

        Ok(Self {
            nodes,
            edges,
            degrees,
            node_id_to_index,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges incident to the node at `index`
    pub fn degree(&self, index: usize) -> usize {
        self.degrees[index]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_id_to_index.get(id).copied()
    }

    /// Find a node by id
    pub fn lookup(&self, id: &str) -> Result<&Node> {
        self.index_of(id)
            .map(|i| &self.nodes[i])
            .ok_or_else(|| LayoutError::NotFound(id.to_string()))
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }
}
