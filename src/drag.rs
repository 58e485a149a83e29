//! Drag controller: pins dragged nodes and keeps the layout warm
//!
//! While any drag is active the simulation's alpha target is raised so the
//! rest of the graph keeps reacting to the dragged node. Releasing the last
//! drag drops the target back to zero and the layout cools naturally.

use std::collections::HashSet;

use tracing::debug;

use crate::simulation::Simulation;

/// Tracks which nodes are held by an active drag
#[derive(Debug, Clone)]
pub struct DragController {
    reheat_target: f64,
    /// Indices of nodes pinned by a drag
    active: HashSet<usize>,
}

impl DragController {
    pub fn new(reheat_target: f64) -> Self {
        Self {
            reheat_target,
            active: HashSet::new(),
        }
    }

    /// Pin `id` at its current position and reheat.
    ///
    /// Returns `false` (and does nothing) for an unknown id. Starting a drag
    /// on a node that is already being dragged hands the pin to the new drag.
    pub fn start(&mut self, sim: &mut Simulation, id: &str) -> bool {
        let Some(index) = sim.graph().index_of(id) else {
            debug!(id, "drag start on unknown node ignored");
            return false;
        };

        sim.set_alpha_target(self.reheat_target);

        if let Some(node) = sim.graph_mut().node_mut(index) {
            let (x, y) = (node.x, node.y);
            node.pin(x, y);
        }

        if !self.active.insert(index) {
            debug!(id, "drag restarted on an already dragged node");
        }
        true
    }

    /// Move the pin of a dragged node. No-op unless `id` is being dragged.
    pub fn drag(&mut self, sim: &mut Simulation, id: &str, x: f64, y: f64) -> bool {
        let Some(index) = self.dragged_index(sim, id) else {
            return false;
        };
        match sim.graph_mut().node_mut(index) {
            Some(node) => {
                node.pin(x, y);
                true
            }
            None => false,
        }
    }

    /// Release the pin on `id`; cools the layout once no drag remains.
    pub fn end(&mut self, sim: &mut Simulation, id: &str) -> bool {
        let Some(index) = self.dragged_index(sim, id) else {
            return false;
        };
        self.active.remove(&index);

        if let Some(node) = sim.graph_mut().node_mut(index) {
            node.unpin();
        }
        if self.active.is_empty() {
            sim.set_alpha_target(0.0);
        }
        true
    }

    pub fn is_dragging(&self, sim: &Simulation, id: &str) -> bool {
        self.dragged_index(sim, id).is_some()
    }

    /// Number of nodes currently held
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    fn dragged_index(&self, sim: &Simulation, id: &str) -> Option<usize> {
        sim.graph()
            .index_of(id)
            .filter(|index| self.active.contains(index))
    }
}
