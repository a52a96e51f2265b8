//! Wire-format types and constants for arca client ↔ server commands.
//!
//! This crate is intentionally minimal: request/response DTOs, protocol
//! versioning, and path validation. No transport code, no UI state.

use serde::{Deserialize, Serialize};

// ── Protocol version ───────────────────────────────────────────────────────

/// Version this client speaks. Stamped into every request and expected back
/// in every response.
pub const PROTOCOL_VERSION: u32 = 1;

/// Oldest peer protocol version this build still understands.
pub const MIN_PROTOCOL_VERSION: u32 = 1;

/// Check a version echoed by the peer. Returns `Err(message)` if this build
/// cannot safely interpret what that peer sends.
///
/// Version 0 marks a pre-versioning peer; those are accepted for as long as
/// the minimum stays at 1. Anything else outside
/// `MIN_PROTOCOL_VERSION..=PROTOCOL_VERSION` is rejected.
pub fn check_protocol_version(version: u32) -> Result<(), String> {
    match version {
        0 if MIN_PROTOCOL_VERSION <= 1 => Ok(()),
        0 => Err(format!(
            "legacy peer (no protocol version); this build requires >= {MIN_PROTOCOL_VERSION}"
        )),
        v if v < MIN_PROTOCOL_VERSION => Err(format!(
            "protocol version {v} too old; this build requires >= {MIN_PROTOCOL_VERSION}"
        )),
        v if v > PROTOCOL_VERSION => Err(format!(
            "protocol version {v} not supported; this build speaks <= {PROTOCOL_VERSION}"
        )),
        _ => Ok(()),
    }
}

// ── Remote paths ───────────────────────────────────────────────────────────

/// Whether a string is acceptable as a remote archive path.
///
/// Paths are absolute, '/'-separated, and must not climb out of the archive
/// root. The server enforces the same rule; checking client-side keeps bad
/// input out of the command stream entirely.
pub fn is_valid_remote_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') || path.contains('\0') {
        return false;
    }
    !path.split('/').any(|seg| seg == "..")
}

// ── Directory info ─────────────────────────────────────────────────────────

/// Ask the server for a recursive file count and total size under `path`.
///
/// `timeout_ms` is the computation budget: the server stops walking when it
/// is exhausted and reports what it has, flagging the result as truncated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirInfoRequest {
    pub path: String,
    pub timeout_ms: u64,
    #[serde(default)]
    pub protocol_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirInfoResponse {
    pub file_count: u64,
    pub total_size: u64,
    /// True when the server ran out of budget and `file_count`/`total_size`
    /// cover only part of the subtree.
    #[serde(default)]
    pub truncated: bool,
    /// Version the server spoke when producing this response; 0 from
    /// pre-versioning servers.
    #[serde(default)]
    pub protocol_version: u32,
}

// ── Directory listing ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDirRequest {
    pub path: String,
    #[serde(default)]
    pub protocol_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirEntryDto {
    pub name: String,
    pub is_dir: bool,
    /// File size in bytes; 0 for directories (their recursive size is
    /// computed separately via [`DirInfoRequest`]).
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDirResponse {
    pub entries: Vec<DirEntryDto>,
    /// Version the server spoke when producing this response; 0 from
    /// pre-versioning servers.
    #[serde(default)]
    pub protocol_version: u32,
}
