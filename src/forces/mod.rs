//! Force contributors and the registry that runs them
//!
//! Every force reads the current node positions and adds to node velocities
//! in place. The registry keeps forces in insertion order; the standard set
//! runs link → charge → center → collision, so collision acts as a
//! positional constraint on top of the velocity-based forces.
//!
//! # Forces
//!
//! - **Link Force**: Spring forces between connected nodes (edges)
//! - **Many-Body Force**: d3-style charge between all nodes, falling off as 1/d
//! - **Center Force**: Moves the centroid toward the container center
//! - **Collide Force**: Separates overlapping node disks

mod center;
mod collide;
mod link;
mod many_body;
pub mod quadtree;

use std::fmt;

pub use center::CenterForce;
pub use collide::CollideForce;
pub use link::LinkForce;
pub use many_body::ManyBodyForce;

use crate::config::LayoutOptions;
use crate::graph::{Graph, Node};

/// Registry name of the link force
pub const LINK: &str = "link";
/// Registry name of the many-body force
pub const CHARGE: &str = "charge";
/// Registry name of the centering force
pub const CENTER: &str = "center";
/// Registry name of the collision force
pub const COLLISION: &str = "collision";

/// A force contributor, invoked once per tick.
pub trait Force {
    /// Adjust node velocities for the current positions and alpha
    fn apply(&mut self, nodes: &mut [Node], alpha: f64);
}

/// Ordered, named collection of forces
#[derive(Default)]
pub struct ForceRegistry {
    forces: Vec<(String, Box<dyn Force>)>,
}

impl fmt::Debug for ForceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl ForceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The four forces of a standard layout, in application order
    pub fn standard(graph: &Graph, options: &LayoutOptions, center: (f64, f64)) -> Self {
        let mut registry = Self::new();
        registry.insert(LINK, LinkForce::new(graph, options.link_distance));
        registry.insert(
            CHARGE,
            ManyBodyForce::new(options.charge_strength, options.distance_min)
                .with_theta(options.theta),
        );
        registry.insert(CENTER, CenterForce::new(center, options.center_strength));
        registry.insert(
            COLLISION,
            CollideForce::new(
                graph,
                options.collision_padding,
                options.collision_iterations,
                options.collision_tolerance,
            ),
        );
        registry
    }

    /// Register a force under `name`.
    ///
    /// An existing force with the same name is replaced in place and
    /// returned; otherwise the force is appended and runs last.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        force: impl Force + 'static,
    ) -> Option<Box<dyn Force>> {
        let name = name.into();
        let force: Box<dyn Force> = Box::new(force);
        match self.forces.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, force)),
            None => {
                self.forces.push((name, force));
                None
            }
        }
    }

    /// Remove the force registered under `name`
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Force>> {
        let index = self.forces.iter().position(|(n, _)| n == name)?;
        Some(self.forces.remove(index).1)
    }

    /// Mutable access to the force registered under `name`
    pub fn get(&mut self, name: &str) -> Option<&mut (dyn Force + 'static)> {
        self.forces
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, force)| force.as_mut())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.forces.iter().any(|(n, _)| n == name)
    }

    /// Force names in application order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.forces.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Run every force once, in order
    pub fn apply_all(&mut self, nodes: &mut [Node], alpha: f64) {
        for (_, force) in &mut self.forces {
            force.apply(nodes, alpha);
        }
    }
}

/// Unit direction used to separate two coincident nodes.
///
/// Derived from the pair's indices so runs stay reproducible. Computed in
/// `f64` so any index is accepted.
pub(crate) fn separation_direction(i: usize, j: usize) -> (f64, f64) {
    let angle = (i as f64 * 7.0 + j as f64 * 13.0 + 1.0) * 2.399_963_229_728_653;
    (angle.cos(), angle.sin())
}
