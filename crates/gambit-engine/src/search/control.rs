//! Search control: stop flag, wall clock, and node limit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Quiescence reads the clock only when `nodes & CLOCK_POLL_MASK == 0`.
const CLOCK_POLL_MASK: u64 = 1023;

/// Decides when a search must stop.
///
/// The hard limit aborts the current iteration; the soft limit only keeps
/// the driver from starting another one. Once any limit fires, the shared
/// stop flag is raised so every later check returns immediately.
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl SearchControl {
    /// No time pressure; only the external flag or a node limit stops it.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: None,
            hard_limit: None,
            node_limit: None,
        }
    }

    /// Clock starts now.
    pub fn new_timed(stopped: Arc<AtomicBool>, soft: Duration, hard: Duration) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: Some(soft),
            hard_limit: Some(hard),
            node_limit: None,
        }
    }

    /// Stop once more than `nodes` nodes have been visited.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Check at every principal search node. Reads the clock each call.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if self.over_node_limit(nodes) || self.over_hard_limit() {
            self.stop();
            return true;
        }
        false
    }

    /// Cheaper check for quiescence nodes: the clock is read every 1024 nodes.
    pub fn poll(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if self.over_node_limit(nodes) || (nodes & CLOCK_POLL_MASK == 0 && self.over_hard_limit()) {
            self.stop();
            return true;
        }
        false
    }

    /// Whether the driver should skip starting another iteration.
    pub fn should_stop_iterating(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        self.soft_limit.is_some_and(|soft| self.elapsed() >= soft)
    }

    fn over_node_limit(&self, nodes: u64) -> bool {
        self.node_limit.is_some_and(|limit| nodes > limit)
    }

    fn over_hard_limit(&self) -> bool {
        self.hard_limit.is_some_and(|hard| self.elapsed() >= hard)
    }

    /// Raise the stop flag.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Time since the control was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
