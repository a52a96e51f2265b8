use std::fmt;

/// Opaque identifier for a UI node awaiting a directory summary.
///
/// The scheduler never dereferences anything through this value; the UI layer
/// owns the registry that maps it back to a live widget, which keeps all
/// widget access on the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// One pending directory-info fetch.
///
/// `path` and `depth` are fixed at creation; only `timeout_ms` changes, and
/// only through [`escalate`](Request::escalate).
#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub path: String,
    pub depth: usize,
    pub timeout_ms: u64,
    pub target: NodeId,
}

impl Request {
    pub fn new(path: impl Into<String>, target: NodeId, timeout_ms: u64) -> Self {
        let path = path.into();
        let depth = path.bytes().filter(|&b| b == b'/').count();
        Self {
            path,
            depth,
            timeout_ms,
            target,
        }
    }

    /// Queue order: deeper directories first; among equal depth, the cheaper
    /// attempt first so short retries are not starved behind long budgets.
    pub fn outranks(&self, other: &Request) -> bool {
        self.depth > other.depth
            || (self.depth == other.depth && self.timeout_ms < other.timeout_ms)
    }

    /// Grow the budget after a truncated result. The budget never decreases;
    /// once it reaches `max_ms` it stays there instead of being dropped.
    pub fn escalate(&mut self, step_ms: u64, max_ms: u64) {
        if self.timeout_ms + step_ms <= max_ms {
            self.timeout_ms += step_ms;
        } else {
            self.timeout_ms = self.timeout_ms.max(max_ms);
        }
    }
}
