//! Host web-service transport interface

use crate::error::ABError;
use std::time::Duration;

/// A GET request to submit to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub host: String,
    pub port: u16,
    /// Absolute path, starting with `/`
    pub path: String,
    /// Jump ahead of normal-priority requests
    pub priority: bool,
}

impl DownloadRequest {
    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }
}

/// Reply details the transport passes alongside the body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status, if a response was received at all
    pub status: Option<u16>,
    pub url: String,
}

/// Outcome of a download, delivered once to the handler
#[derive(Debug, Clone)]
pub struct Response {
    pub body: String,
    pub reply: Reply,
    /// Set when the transport failed; `body` should then be ignored
    pub error: Option<ABError>,
}

/// Completion callback; the transport invokes it at most once
pub type ResponseHandler = Box<dyn FnOnce(Response) + Send + 'static>;

/// Asynchronous download service provided by the host
pub trait WebService: Send + Sync {
    /// Queue `request`; returns immediately and calls `handler` later
    fn download(&self, request: DownloadRequest, handler: ResponseHandler);

    /// Minimum delay between consecutive requests to `host:port`
    fn set_request_delay(&self, host: &str, port: u16, delay: Duration);
}
