//! Client side of the archive server's browsing commands.

mod rest_client;

use std::time::Duration;

use crate::error::Result;

pub use rest_client::RestClient;

/// Recursive summary of a directory subtree as computed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirInfo {
    pub file_count: u64,
    pub total_size: u64,
    /// True when the server ran out of budget before finishing the walk;
    /// `file_count` and `total_size` are then partial.
    pub truncated: bool,
}

/// A single entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    /// File size in bytes; 0 for directories.
    pub size: u64,
}

/// Remote browsing operations the client depends on.
///
/// `query_dir_info` may block for up to `timeout` plus normal network
/// latency; the budget is a hint honored server-side, not a hard local
/// deadline.
pub trait RemoteBrowser: Send + Sync {
    fn query_dir_info(&self, path: &str, timeout: Duration) -> Result<DirInfo>;
    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>>;
}
