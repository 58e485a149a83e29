//! Integrator and cooling schedule
//!
//! A tick runs every registered force, integrates positions, holds pinned
//! nodes in place and cools alpha toward its target. The simulation is
//! `Running` while it still has energy to spend and `Settled` once alpha has
//! reached its floor with nothing holding it up.

use tracing::{debug, trace};

use crate::config::LayoutOptions;
use crate::forces::ForceRegistry;
use crate::graph::Graph;
use crate::snapshot::TickSnapshot;

/// Whether the simulation wants more ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// Alpha is above its floor, or a drag is holding the target up
    Running,
    /// Alpha has decayed to its floor; no further ticks are needed
    Settled,
}

/// CPU force simulation
#[derive(Debug)]
pub struct Simulation {
    graph: Graph,
    forces: ForceRegistry,
    alpha: f64,
    alpha_target: f64,
    alpha_decay: f64,
    alpha_min: f64,
    velocity_damping: f64,
    state: SimulationState,
    ticks: u64,
}

impl Simulation {
    /// Create a hot simulation with the standard forces centered on `center`
    pub fn new(graph: Graph, options: &LayoutOptions, center: (f64, f64)) -> Self {
        let forces = ForceRegistry::standard(&graph, options, center);
        Self::with_forces(graph, forces, options)
    }

    /// Create a hot simulation with a custom force registry
    pub fn with_forces(graph: Graph, forces: ForceRegistry, options: &LayoutOptions) -> Self {
        Self {
            graph,
            forces,
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: options.alpha_decay,
            alpha_min: options.alpha_min,
            velocity_damping: options.velocity_damping,
            state: SimulationState::Running,
            ticks: 0,
        }
    }

    /// Run one simulation tick
    pub fn tick(&mut self) {
        let alpha = self.alpha;
        self.forces.apply_all(self.graph.nodes_mut(), alpha);

        for node in self.graph.nodes_mut() {
            match (node.fx, node.fy) {
                (Some(fx), Some(fy)) => {
                    node.x = fx;
                    node.y = fy;
                    node.vx = 0.0;
                    node.vy = 0.0;
                }
                _ => {
                    node.x += node.vx;
                    node.y += node.vy;
                    node.vx *= self.velocity_damping;
                    node.vy *= self.velocity_damping;
                }
            }
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.ticks += 1;
        trace!(tick = self.ticks, alpha = self.alpha, "tick");

        if self.state == SimulationState::Running
            && self.alpha <= self.alpha_min
            && self.alpha_target <= 0.0
        {
            self.state = SimulationState::Settled;
            debug!(ticks = self.ticks, alpha = self.alpha, "simulation settled");
        }
    }

    /// Tick until settled or `max_ticks` have run; returns the ticks run
    pub fn run_to_convergence(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while self.is_running() && ticks < max_ticks {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Set alpha directly; a value above the floor resumes ticking
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
        if self.alpha > self.alpha_min {
            self.resume();
        }
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    /// Set the value alpha decays toward; a positive target resumes ticking
    pub fn set_alpha_target(&mut self, target: f64) {
        self.alpha_target = target.clamp(0.0, 1.0);
        if self.alpha_target > 0.0 {
            self.resume();
        }
    }

    /// Restart from full temperature
    pub fn reheat(&mut self) {
        self.set_alpha(1.0);
    }

    fn resume(&mut self) {
        if self.state == SimulationState::Settled {
            debug!(alpha = self.alpha, target = self.alpha_target, "simulation reheated");
        }
        self.state = SimulationState::Running;
    }

    /// Ticks run since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Forces in application order; insert or remove to customize a layout
    pub fn forces_mut(&mut self) -> &mut ForceRegistry {
        &mut self.forces
    }

    /// Sum of squared velocities over all nodes
    pub fn kinetic_energy(&self) -> f64 {
        self.graph
            .nodes()
            .iter()
            .map(|n| n.vx * n.vx + n.vy * n.vy)
            .sum()
    }

    /// Current positions of every node and edge
    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot::capture(&self.graph, self.ticks, self.alpha)
    }
}
