//! Background fetcher for recursive directory size/count summaries.
//!
//! The file browser shows a tree of remote directories; computing "how big
//! is this subtree" server-side can take arbitrarily long, so it must never
//! block the UI. Expansion events submit fire-and-forget requests here; a
//! single worker thread services them deepest-directory-first, retries
//! truncated computations with an escalating budget, and hands finished
//! results back to the UI thread. Results for nodes the UI has since
//! discarded are silently dropped.

mod dispatch;
mod queue;
mod request;
mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::debug;

use crate::config::DirInfoConfig;
use crate::remote::RemoteBrowser;

pub use dispatch::NodeView;
pub use request::NodeId;

use dispatch::ResultDispatcher;
use queue::RequestQueue;
use request::Request;
use worker::Worker;

/// Owning handle for the scheduler: the queue, the live-enabled flag, and
/// the worker thread. Dropping it drains the queue and joins the worker.
pub struct DirInfoScheduler {
    queue: Arc<RequestQueue>,
    enabled: Arc<AtomicBool>,
    default_timeout_ms: u64,
    max_timeout_ms: u64,
    worker: Option<JoinHandle<()>>,
}

impl DirInfoScheduler {
    /// Start the worker thread against a remote client and a UI view.
    pub fn spawn(
        config: &DirInfoConfig,
        client: Arc<dyn RemoteBrowser>,
        view: Arc<dyn NodeView>,
    ) -> Self {
        let queue = Arc::new(RequestQueue::new());
        let enabled = Arc::new(AtomicBool::new(config.enabled));

        let worker = Worker::new(
            queue.clone(),
            enabled.clone(),
            client,
            ResultDispatcher::new(view),
            config.timeout_step_ms,
            config.max_timeout_ms,
        );
        let handle = std::thread::spawn(move || worker.run());

        Self {
            queue,
            enabled,
            default_timeout_ms: config.default_timeout_ms,
            max_timeout_ms: config.max_timeout_ms,
            worker: Some(handle),
        }
    }

    /// Queue a summary fetch for `path`, delivered to `target` when done.
    ///
    /// Fire-and-forget: never blocks, never reports an error back. `target`
    /// may become invalid at any time afterwards; that is handled at dequeue
    /// and delivery time, not here.
    pub fn submit(&self, path: &str, target: NodeId) {
        self.submit_with_timeout(path, target, self.default_timeout_ms);
    }

    pub fn submit_with_timeout(&self, path: &str, target: NodeId, timeout_ms: u64) {
        if path.is_empty() {
            debug!("ignoring directory-info request with empty path");
            return;
        }
        let timeout_ms = timeout_ms.min(self.max_timeout_ms);
        self.queue.push(Request::new(path, target, timeout_ms));
    }

    /// Abandon all queued requests. A request the worker is currently
    /// executing finishes naturally; its delivery then stands or falls on
    /// the target-validity check alone.
    pub fn clear(&self) {
        self.queue.clear();
    }

    /// Live toggle, consulted by the worker at the top of each cycle. While
    /// disabled, dequeued requests are dropped without a remote call.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Number of requests waiting (excludes any in-flight request).
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Drop for DirInfoScheduler {
    fn drop(&mut self) {
        self.queue.clear();
        self.queue.close();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
