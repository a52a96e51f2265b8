use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use super::request::Request;

/// Pending requests, kept sorted most-preferred-first at all times.
///
/// Single producer (UI thread via submit/clear), single consumer (the worker
/// thread). One lock guards every queue mutation; it is never held across a
/// remote call. An insertion into an empty queue wakes the blocked consumer.
pub(crate) struct RequestQueue {
    state: Mutex<State>,
    available: Condvar,
}

struct State {
    pending: VecDeque<Request>,
    closed: bool,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                pending: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Sorted linear insertion: place the request immediately before the
    /// first pending entry it outranks, or at the back if it outranks none.
    pub fn push(&self, req: Request) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.closed {
            return;
        }
        match state.pending.iter().position(|queued| req.outranks(queued)) {
            Some(i) => state.pending.insert(i, req),
            None => state.pending.push_back(req),
        }
        debug_assert!(is_ordered(&state.pending));
        self.available.notify_one();
    }

    /// Block until a request is available; `None` once the queue is closed
    /// and drained.
    pub fn pop(&self) -> Option<Request> {
        let Ok(mut state) = self.state.lock() else {
            return None;
        };
        loop {
            if let Some(req) = state.pending.pop_front() {
                return Some(req);
            }
            if state.closed {
                return None;
            }
            state = self.available.wait(state).ok()?;
        }
    }

    /// Abandon everything queued. Does not touch a request the consumer has
    /// already taken out.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.pending.clear();
        }
    }

    pub fn close(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.closed = true;
        }
        self.available.notify_all();
    }

    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.pending.len()).unwrap_or(0)
    }
}

/// Adjacent pairs respect the total order: front has depth >= back, and on
/// equal depth, timeout <= back.
fn is_ordered(pending: &VecDeque<Request>) -> bool {
    pending
        .iter()
        .zip(pending.iter().skip(1))
        .all(|(a, b)| a.depth > b.depth || (a.depth == b.depth && a.timeout_ms <= b.timeout_ms))
}
