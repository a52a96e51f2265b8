use std::sync::Arc;

use tracing::trace;

use super::request::NodeId;

/// What the scheduler needs from the UI layer.
///
/// Implementations live on the GUI side. `render` must not mutate any
/// UI-visible state inline: it schedules the update onto the UI thread and
/// re-checks `is_valid` there, since the node can disappear between the
/// worker's check and the event loop running the closure.
pub trait NodeView: Send + Sync {
    /// Whether the node a request was created for still exists.
    fn is_valid(&self, node: NodeId) -> bool;

    /// Schedule a size/count update for `node` on the UI thread.
    ///
    /// `provisional` marks a truncated (partial) result; the UI shows it in a
    /// distinguishing style and clears the marker when a later final delivery
    /// for the same node arrives.
    fn render(&self, node: NodeId, total_size: u64, file_count: u64, provisional: bool);
}

/// Hands computed results to the UI, skipping nodes that no longer exist.
pub(crate) struct ResultDispatcher {
    view: Arc<dyn NodeView>,
}

impl ResultDispatcher {
    pub fn new(view: Arc<dyn NodeView>) -> Self {
        Self { view }
    }

    pub fn target_alive(&self, node: NodeId) -> bool {
        self.view.is_valid(node)
    }

    pub fn deliver(&self, node: NodeId, total_size: u64, file_count: u64, provisional: bool) {
        // The node may have gone away while the remote call was running.
        if !self.view.is_valid(node) {
            trace!("dropping directory info for stale {node}");
            return;
        }
        self.view.render(node, total_size, file_count, provisional);
    }
}
