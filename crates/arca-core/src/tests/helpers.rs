use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::config::DirInfoConfig;
use crate::dirinfo::{DirInfoScheduler, NodeId, NodeView};
use crate::error::{ArcaError, Result};
use crate::remote::{DirEntry, DirInfo, RemoteBrowser};

pub fn info(file_count: u64, total_size: u64, truncated: bool) -> DirInfo {
    DirInfo {
        file_count,
        total_size,
        truncated,
    }
}

pub fn spawn_scheduler(client: &Arc<FakeBrowser>, view: &Arc<RecordingView>) -> DirInfoScheduler {
    DirInfoScheduler::spawn(&DirInfoConfig::default(), client.clone(), view.clone())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub path: String,
    pub timeout_ms: u64,
}

/// Scripted stand-in for the remote server.
///
/// Responses are consumed FIFO per path; a query for an exhausted or
/// unscripted path fails like a transport error would. A "gate" keeps a call
/// blocked in flight until the test releases it.
pub struct FakeBrowser {
    scripts: Mutex<HashMap<String, VecDeque<Result<DirInfo>>>>,
    gates: Mutex<HashMap<String, Receiver<()>>>,
    query_tx: Sender<QueryRecord>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeBrowser {
    pub fn new() -> (Arc<Self>, Receiver<QueryRecord>) {
        let (query_tx, query_rx) = unbounded();
        (
            Arc::new(Self {
                scripts: Mutex::new(HashMap::new()),
                gates: Mutex::new(HashMap::new()),
                query_tx,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }),
            query_rx,
        )
    }

    pub fn script(&self, path: &str, responses: Vec<Result<DirInfo>>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(path.to_string(), responses.into());
    }

    /// Block queries for `path` until the returned sender fires (or drops).
    pub fn gate(&self, path: &str) -> Sender<()> {
        let (tx, rx) = unbounded();
        self.gates.lock().unwrap().insert(path.to_string(), rx);
        tx
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl RemoteBrowser for FakeBrowser {
    fn query_dir_info(&self, path: &str, timeout: Duration) -> Result<DirInfo> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let _ = self.query_tx.send(QueryRecord {
            path: path.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        });

        let gate = self.gates.lock().unwrap().get(path).cloned();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }

        let response = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(ArcaError::Remote(format!("no scripted response for {path}"))));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }

    fn list_dir(&self, _path: &str) -> Result<Vec<DirEntry>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
    pub node: NodeId,
    pub total_size: u64,
    pub file_count: u64,
    pub provisional: bool,
}

/// Records deliveries and lets tests control which nodes are still alive.
pub struct RecordingView {
    valid: Mutex<HashSet<NodeId>>,
    render_tx: Sender<RenderCall>,
}

impl RecordingView {
    pub fn new() -> (Arc<Self>, Receiver<RenderCall>) {
        let (render_tx, render_rx) = unbounded();
        (
            Arc::new(Self {
                valid: Mutex::new(HashSet::new()),
                render_tx,
            }),
            render_rx,
        )
    }

    pub fn node(&self, id: u64) -> NodeId {
        let node = NodeId(id);
        self.valid.lock().unwrap().insert(node);
        node
    }

    pub fn invalidate(&self, node: NodeId) {
        self.valid.lock().unwrap().remove(&node);
    }
}

impl NodeView for RecordingView {
    fn is_valid(&self, node: NodeId) -> bool {
        self.valid.lock().unwrap().contains(&node)
    }

    fn render(&self, node: NodeId, total_size: u64, file_count: u64, provisional: bool) {
        let _ = self.render_tx.send(RenderCall {
            node,
            total_size,
            file_count,
            provisional,
        });
    }
}
