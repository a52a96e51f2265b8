//! UI-owned registry mapping opaque node ids to listing rows.
//!
//! The scheduler only ever holds a `NodeId`; every lookup and mutation goes
//! through this registry, and `reset` makes all previously issued ids stale
//! in one step. That is what turns "is this tree node still alive?" into a
//! plain map lookup instead of a cross-thread widget access.

use std::collections::HashMap;

use arca_core::dirinfo::NodeId;
use arca_core::remote::DirEntry;

pub struct NodeRegistry {
    next_id: u64,
    base_path: String,
    nodes: HashMap<NodeId, Node>,
    order: Vec<NodeId>,
}

struct Node {
    name: String,
    is_dir: bool,
    file_size: u64,
    summary: Option<Summary>,
}

struct Summary {
    total_size: u64,
    file_count: u64,
    provisional: bool,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            base_path: "/".to_string(),
            nodes: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Replace the whole listing. Ids handed out before this call become
    /// stale, so late scheduler deliveries for the old listing are no-ops.
    pub fn reset(&mut self, base_path: &str) {
        self.nodes.clear();
        self.order.clear();
        self.base_path = base_path.to_string();
    }

    pub fn insert(&mut self, entry: &DirEntry) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                name: entry.name.clone(),
                is_dir: entry.is_dir,
                file_size: entry.size,
                summary: None,
            },
        );
        self.order.push(id);
        id
    }

    pub fn child_path(&self, name: &str) -> String {
        if self.base_path == "/" {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.base_path)
        }
    }

    pub fn is_valid(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Record a delivered summary. A final (non-provisional) delivery clears
    /// the provisional marker a truncated one set earlier.
    pub fn set_summary(
        &mut self,
        node: NodeId,
        total_size: u64,
        file_count: u64,
        provisional: bool,
    ) -> bool {
        match self.nodes.get_mut(&node) {
            Some(n) => {
                n.summary = Some(Summary {
                    total_size,
                    file_count,
                    provisional,
                });
                true
            }
            None => false,
        }
    }

    pub fn render_listing(&self) -> String {
        let mut lines = Vec::with_capacity(self.order.len());
        for id in &self.order {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            lines.push(if node.is_dir {
                let label = format!("{}/", node.name);
                match &node.summary {
                    None => format!("{label:<42} ..."),
                    Some(s) if s.provisional => format!(
                        "{label:<42} ~{} (partial)",
                        format_bytes(s.total_size)
                    ),
                    Some(s) => format!(
                        "{label:<42} {}, {} files",
                        format_bytes(s.total_size),
                        format_count(s.file_count)
                    ),
                }
            } else {
                format!("{:<42} {}", node.name, format_bytes(node.file_size))
            });
        }
        lines.join("\n")
    }
}

/// Trim whitespace, force a leading '/', drop a trailing '/' except on the root.
pub fn normalize_path(input: &str) -> String {
    let trimmed = input.trim();
    let mut path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

pub fn parent_path(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GiB", b / GB)
    } else if b >= MB {
        format!("{:.2} MiB", b / MB)
    } else if b >= KB {
        format!("{:.2} KiB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
