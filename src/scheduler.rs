//! Frame cadence abstraction
//!
//! The engine never drives its own loop. It asks a [`FrameScheduler`] for the
//! next frame and the host calls [`LayoutEngine::on_frame`] with the token it
//! was handed when that frame fires. In a browser this maps onto
//! `requestAnimationFrame`; headless hosts and tests use [`ManualScheduler`].
//!
//! [`LayoutEngine::on_frame`]: crate::engine::LayoutEngine::on_frame

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Handle for one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Host-side frame source
pub trait FrameScheduler {
    /// Ask for a callback on the next frame
    fn request_frame(&mut self) -> FrameToken;

    /// Withdraw a request made by `request_frame`
    fn cancel_frame(&mut self, token: FrameToken);
}

#[derive(Debug, Default)]
struct Queue {
    next_token: u64,
    pending: VecDeque<FrameToken>,
    requested: usize,
    cancelled: usize,
}

/// Scheduler whose frames fire only when the owner pumps them.
///
/// Clones share one queue, so a test can hand a clone to the engine and keep
/// another to drive frames and inspect what was requested.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest pending frame, if any
    pub fn next_frame(&self) -> Option<FrameToken> {
        self.queue.borrow_mut().pending.pop_front()
    }

    /// Number of frames requested and not yet fired or cancelled
    pub fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Total frames ever requested
    pub fn requested(&self) -> usize {
        self.queue.borrow().requested
    }

    /// Total frames cancelled while still pending
    pub fn cancelled(&self) -> usize {
        self.queue.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let mut queue = self.queue.borrow_mut();
        queue.next_token += 1;
        queue.requested += 1;
        let token = FrameToken(queue.next_token);
        queue.pending.push_back(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut queue = self.queue.borrow_mut();
        let before = queue.pending.len();
        queue.pending.retain(|t| *t != token);
        if queue.pending.len() < before {
            queue.cancelled += 1;
        }
    }
}
