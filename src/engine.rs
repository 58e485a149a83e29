//! Layout engine facade
//!
//! [`LayoutEngine`] owns one graph, its simulation and the drag state, and
//! wires them to the host through three ports:
//!
//! - a [`FrameScheduler`] that decides when ticks happen,
//! - tick subscribers that receive a [`TickSnapshot`] after every tick,
//! - pointer input (`pointer_down` / `pointer_move` / `pointer_up`), queued
//!   and applied at the start of the next frame.
//!
//! A frame is requested only while the simulation is running (or while
//! input is waiting to be applied), so a settled layout costs nothing.
//!
//! ```
//! use force_layout::{
//!     EdgeSpec, LayoutEngine, LayoutOptions, ManualScheduler, NodeCategory, NodeSpec,
//! };
//!
//! let frames = ManualScheduler::new();
//! let mut engine = LayoutEngine::create(
//!     vec![
//!         NodeSpec::new("hub", NodeCategory::Hub),
//!         NodeSpec::new("leaf", NodeCategory::Data),
//!     ],
//!     vec![EdgeSpec::new("leaf", "hub")],
//!     600.0,
//!     300.0,
//!     LayoutOptions::default(),
//!     Box::new(frames.clone()),
//! )?;
//!
//! engine.on_tick(|snapshot| println!("tick {} alpha {:.3}", snapshot.tick, snapshot.alpha));
//! while let Some(token) = frames.next_frame() {
//!     engine.on_frame(token);
//! }
//! assert!(!engine.is_running());
//! # Ok::<(), force_layout::LayoutError>(())
//! ```

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace};

use crate::config::LayoutOptions;
use crate::drag::DragController;
use crate::error::{LayoutError, Result};
use crate::graph::{EdgeSpec, Graph, NodeSpec};
use crate::scheduler::{FrameScheduler, FrameToken};
use crate::simulation::Simulation;
use crate::snapshot::TickSnapshot;

/// Handle returned by [`LayoutEngine::on_tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type TickCallback = Box<dyn FnMut(&TickSnapshot)>;

#[derive(Debug, Clone, PartialEq)]
enum PointerEvent {
    Down(String),
    Move(String, f64, f64),
    Up(String),
}

/// Live simulation plus everything that dies with it
struct Live {
    sim: Simulation,
    drag: DragController,
    input: VecDeque<PointerEvent>,
    pending_frame: Option<FrameToken>,
}

/// Force-directed layout of one graph inside a `width` x `height` container
pub struct LayoutEngine {
    nodes: Vec<NodeSpec>,
    edges: Vec<EdgeSpec>,
    options: LayoutOptions,
    width: f64,
    height: f64,
    scheduler: Box<dyn FrameScheduler>,
    subscribers: Vec<(SubscriptionId, TickCallback)>,
    next_subscription: u64,
    /// `None` once disposed
    live: Option<Live>,
}

impl LayoutEngine {
    /// Build the graph and simulation and request the first frame.
    ///
    /// Fails on non-positive or non-finite bounds, invalid options, duplicate
    /// node ids, or edges naming a node that does not exist.
    pub fn create(
        nodes: Vec<NodeSpec>,
        edges: Vec<EdgeSpec>,
        width: f64,
        height: f64,
        options: LayoutOptions,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Result<Self> {
        check_bounds(width, height)?;
        options.validate()?;
        let sim = build_simulation(&nodes, &edges, width, height, &options)?;

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            width,
            height,
            "layout engine created"
        );

        let mut engine = Self {
            live: Some(Live {
                sim,
                drag: DragController::new(options.reheat_alpha_target),
                input: VecDeque::new(),
                pending_frame: None,
            }),
            nodes,
            edges,
            options,
            width,
            height,
            scheduler,
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        engine.ensure_frame();
        Ok(engine)
    }

    /// Register a callback invoked with the snapshot of every tick.
    ///
    /// Callbacks run from inside [`on_frame`](Self::on_frame) only. After
    /// disposal the callback is dropped immediately.
    pub fn on_tick(&mut self, callback: impl FnMut(&TickSnapshot) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        if self.live.is_some() {
            self.subscribers.push((id, Box::new(callback)));
        }
        id
    }

    /// Remove a subscriber; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() < before
    }

    /// Grab a node. Pins it and reheats the layout on the next frame.
    pub fn pointer_down(&mut self, id: &str) {
        self.queue(PointerEvent::Down(id.to_string()));
    }

    /// Move a grabbed node to `(x, y)`
    pub fn pointer_move(&mut self, id: &str, x: f64, y: f64) {
        self.queue(PointerEvent::Move(id.to_string(), x, y));
    }

    /// Release a grabbed node
    pub fn pointer_up(&mut self, id: &str) {
        self.queue(PointerEvent::Up(id.to_string()));
    }

    /// Handle a frame fired by the scheduler.
    ///
    /// Tokens other than the one currently pending are ignored. Otherwise
    /// queued input is applied, one tick runs if the simulation is running,
    /// subscribers receive the snapshot, and the next frame is requested
    /// while the simulation still has work to do.
    pub fn on_frame(&mut self, token: FrameToken) {
        let Some(live) = self.live.as_mut() else {
            trace!(?token, "frame after dispose ignored");
            return;
        };
        if live.pending_frame != Some(token) {
            trace!(?token, "stale frame ignored");
            return;
        }
        live.pending_frame = None;

        while let Some(event) = live.input.pop_front() {
            let handled = match &event {
                PointerEvent::Down(id) => live.drag.start(&mut live.sim, id),
                PointerEvent::Move(id, x, y) => live.drag.drag(&mut live.sim, id, *x, *y),
                PointerEvent::Up(id) => live.drag.end(&mut live.sim, id),
            };
            if !handled {
                debug!(?event, "pointer event ignored");
            }
        }

        if live.sim.is_running() {
            live.sim.tick();
            trace!(
                tick = live.sim.ticks(),
                energy = live.sim.kinetic_energy(),
                "frame"
            );
            let snapshot = live.sim.snapshot();
            for (_, callback) in &mut self.subscribers {
                callback(&snapshot);
            }
        }

        self.ensure_frame();
    }

    /// Replace the container and start the layout over.
    ///
    /// The graph is rebuilt from the original node and edge specs with the
    /// new bounds at full temperature; positions, pins and queued input are
    /// discarded while subscribers are kept. A no-op after disposal.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        check_bounds(width, height)?;
        let Some(live) = self.live.as_mut() else {
            return Ok(());
        };

        let sim = build_simulation(&self.nodes, &self.edges, width, height, &self.options)?;
        if let Some(token) = live.pending_frame.take() {
            self.scheduler.cancel_frame(token);
        }
        live.sim = sim;
        live.drag = DragController::new(self.options.reheat_alpha_target);
        live.input.clear();
        self.width = width;
        self.height = height;

        debug!(width, height, "layout engine resized");
        self.ensure_frame();
        Ok(())
    }

    /// Stop the layout for good.
    ///
    /// Cancels the pending frame and drops subscribers, queued input and the
    /// simulation. Safe to call any number of times; also runs on drop.
    pub fn dispose(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        if let Some(token) = live.pending_frame {
            self.scheduler.cancel_frame(token);
        }
        self.subscribers.clear();
        debug!(ticks = live.sim.ticks(), "layout engine disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.live.is_none()
    }

    /// Whether the simulation still wants frames
    pub fn is_running(&self) -> bool {
        self.live.as_ref().is_some_and(|live| live.sim.is_running())
    }

    pub fn alpha(&self) -> Option<f64> {
        self.live.as_ref().map(|live| live.sim.alpha())
    }

    /// Current positions, or `None` after disposal
    pub fn snapshot(&self) -> Option<TickSnapshot> {
        self.live.as_ref().map(|live| live.sim.snapshot())
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.live.as_ref().map(|live| &live.sim)
    }

    /// Container size as `(width, height)`
    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn queue(&mut self, event: PointerEvent) {
        let Some(live) = self.live.as_mut() else {
            debug!(?event, "pointer event after dispose ignored");
            return;
        };
        live.input.push_back(event);
        self.ensure_frame();
    }

    /// Request a frame unless one is pending or there is nothing to do
    fn ensure_frame(&mut self) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        let wanted = live.sim.is_running() || !live.input.is_empty();
        if wanted && live.pending_frame.is_none() {
            live.pending_frame = Some(self.scheduler.request_frame());
        }
    }
}

impl Drop for LayoutEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("subscribers", &self.subscribers.len())
            .field("state", &self.live.as_ref().map(|live| live.sim.state()))
            .finish()
    }
}

fn check_bounds(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidBounds { width, height })
    }
}

fn build_simulation(
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    width: f64,
    height: f64,
    options: &LayoutOptions,
) -> Result<Simulation> {
    let center = (width / 2.0, height / 2.0);
    let graph = Graph::build(nodes, edges, center)?;
    Ok(Simulation::new(graph, options, center))
}
