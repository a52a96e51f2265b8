use std::time::Duration;

use arca_protocol::{
    check_protocol_version, DirInfoRequest, DirInfoResponse, ListDirRequest, ListDirResponse,
    PROTOCOL_VERSION,
};

use crate::error::{ArcaError, Result};
use crate::remote::{DirEntry, DirInfo, RemoteBrowser};

/// Headroom on top of the server-side budget so a call that the server
/// finishes right at its deadline still gets its response across the wire.
const NETWORK_GRACE: Duration = Duration::from_secs(30);

/// HTTP/JSON client for the archive server's browsing endpoints.
pub struct RestClient {
    /// Base URL, e.g. "https://backup.example.com"
    base_url: String,
    agent: ureq::Agent,
    token: Option<String>,
}

impl RestClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .build();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
            token: token.map(|t| t.to_string()),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    fn apply_auth(&self, req: ureq::Request) -> ureq::Request {
        if let Some(ref token) = self.token {
            req.set("Authorization", &format!("Bearer {token}"))
        } else {
            req
        }
    }
}

impl RemoteBrowser for RestClient {
    fn query_dir_info(&self, path: &str, timeout: Duration) -> Result<DirInfo> {
        let req = self
            .apply_auth(self.agent.post(&self.url("dirinfo")))
            .timeout(timeout + NETWORK_GRACE);

        let resp = req
            .send_json(DirInfoRequest {
                path: path.to_string(),
                timeout_ms: timeout.as_millis() as u64,
                protocol_version: PROTOCOL_VERSION,
            })
            .map_err(|e| ArcaError::Remote(format!("dirinfo '{path}': {e}")))?;

        let body: DirInfoResponse = resp
            .into_json()
            .map_err(|e| ArcaError::BadResponse(format!("dirinfo '{path}': {e}")))?;
        check_protocol_version(body.protocol_version)
            .map_err(|e| ArcaError::BadResponse(format!("dirinfo '{path}': {e}")))?;

        Ok(DirInfo {
            file_count: body.file_count,
            total_size: body.total_size,
            truncated: body.truncated,
        })
    }

    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let req = self.apply_auth(self.agent.post(&self.url("list")));

        let resp = req
            .send_json(ListDirRequest {
                path: path.to_string(),
                protocol_version: PROTOCOL_VERSION,
            })
            .map_err(|e| ArcaError::Remote(format!("list '{path}': {e}")))?;

        let body: ListDirResponse = resp
            .into_json()
            .map_err(|e| ArcaError::BadResponse(format!("list '{path}': {e}")))?;
        check_protocol_version(body.protocol_version)
            .map_err(|e| ArcaError::BadResponse(format!("list '{path}': {e}")))?;

        Ok(body
            .entries
            .into_iter()
            .map(|e| DirEntry {
                name: e.name,
                is_dir: e.is_dir,
                size: e.size,
            })
            .collect())
    }
}
