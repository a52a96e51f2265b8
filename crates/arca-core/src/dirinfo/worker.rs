use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::remote::RemoteBrowser;

use super::dispatch::ResultDispatcher;
use super::queue::RequestQueue;
use super::request::Request;

/// The single consumer of the request queue.
///
/// Blocks while the queue is empty and while a remote call is running, so at
/// most one directory-info call is ever outstanding. Every per-request
/// failure is handled by dropping that one request; nothing escapes the loop.
pub(crate) struct Worker {
    queue: Arc<RequestQueue>,
    enabled: Arc<AtomicBool>,
    client: Arc<dyn RemoteBrowser>,
    dispatcher: ResultDispatcher,
    timeout_step_ms: u64,
    max_timeout_ms: u64,
}

impl Worker {
    pub fn new(
        queue: Arc<RequestQueue>,
        enabled: Arc<AtomicBool>,
        client: Arc<dyn RemoteBrowser>,
        dispatcher: ResultDispatcher,
        timeout_step_ms: u64,
        max_timeout_ms: u64,
    ) -> Self {
        Self {
            queue,
            enabled,
            client,
            dispatcher,
            timeout_step_ms,
            max_timeout_ms,
        }
    }

    pub fn run(self) {
        while let Some(req) = self.queue.pop() {
            self.process(req);
        }
        trace!("directory-info worker shutting down");
    }

    fn process(&self, mut req: Request) {
        // Live toggle, re-read every cycle.
        if !self.enabled.load(Ordering::Relaxed) {
            trace!("directory info disabled, dropping '{}'", req.path);
            return;
        }

        if !self.dispatcher.target_alive(req.target) {
            trace!("skipping '{}': {} is gone", req.path, req.target);
            return;
        }

        let info = match self
            .client
            .query_dir_info(&req.path, Duration::from_millis(req.timeout_ms))
        {
            Ok(info) => info,
            Err(e) => {
                // Best effort: size hints are not worth retrying on hard failure.
                debug!("directory info for '{}' failed: {e}", req.path);
                return;
            }
        };

        if !info.truncated {
            self.dispatcher
                .deliver(req.target, info.total_size, info.file_count, false);
            return;
        }

        // Partial result: show what the server got to, then try again with a
        // bigger budget.
        self.dispatcher
            .deliver(req.target, info.total_size, info.file_count, true);
        req.escalate(self.timeout_step_ms, self.max_timeout_ms);
        self.queue.push(req);
    }
}
