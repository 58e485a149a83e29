//! force-layout - Force-directed graph layout with an explicit engine lifecycle.
//!
//! A [`LayoutEngine`] lays out a small graph of hub, data and insight nodes
//! inside a fixed container. Spring links, many-body repulsion, centering and
//! collision forces run on every frame until the layout cools down; tick
//! subscribers receive the node and edge positions to draw, and pointer input
//! lets the user drag nodes around.
//!
//! The pieces are usable on their own: [`Graph`] and [`Simulation`] for
//! headless layouts, [`ForceRegistry`] to customize forces, and
//! [`GraphDocument`] to load graphs from JSON or YAML.

pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod forces;
pub mod graph;
pub mod io;
pub mod scheduler;
pub mod simulation;
pub mod snapshot;

pub use config::LayoutOptions;
pub use drag::DragController;
pub use engine::{LayoutEngine, SubscriptionId};
pub use error::{LayoutError, Result};
pub use forces::{Force, ForceRegistry};
pub use graph::{EdgeSpec, Graph, Node, NodeCategory, NodeSpec};
pub use io::{DocumentFormat, GraphDocument, IoError};
pub use scheduler::{FrameScheduler, FrameToken, ManualScheduler};
pub use simulation::{Simulation, SimulationState};
pub use snapshot::{EdgeSegment, NodePosition, TickSnapshot};
