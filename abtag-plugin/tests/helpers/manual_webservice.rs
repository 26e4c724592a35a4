//! In-memory WebService that holds requests until the test answers them

use abtag_plugin::host::{DownloadRequest, Reply, Response, ResponseHandler};
use abtag_plugin::{ABError, WebService};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct ManualWebService {
    queued: Mutex<Vec<(DownloadRequest, ResponseHandler)>>,
    delays: Mutex<Vec<(String, u16, Duration)>>,
}

impl ManualWebService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<DownloadRequest> {
        self.queued
            .lock()
            .unwrap()
            .iter()
            .map(|(r, _)| r.clone())
            .collect()
    }

    pub fn delays(&self) -> Vec<(String, u16, Duration)> {
        self.delays.lock().unwrap().clone()
    }

    /// Answer the queued request whose path ends with `suffix`
    pub fn respond(&self, suffix: &str, response: Response) {
        let (_, handler) = {
            let mut queued = self.queued.lock().unwrap();
            let index = queued
                .iter()
                .position(|(r, _)| r.path.ends_with(suffix))
                .unwrap_or_else(|| panic!("no queued request ending with {}", suffix));
            queued.remove(index)
        };
        handler(response);
    }

    pub fn respond_ok(&self, suffix: &str, body: &str) {
        self.respond(
            suffix,
            Response {
                body: body.to_string(),
                reply: Reply {
                    status: Some(200),
                    url: suffix.to_string(),
                },
                error: None,
            },
        );
    }

    pub fn respond_error(&self, suffix: &str, error: ABError) {
        self.respond(
            suffix,
            Response {
                body: String::new(),
                reply: Reply {
                    status: None,
                    url: suffix.to_string(),
                },
                error: Some(error),
            },
        );
    }
}

impl WebService for ManualWebService {
    fn download(&self, request: DownloadRequest, handler: ResponseHandler) {
        self.queued.lock().unwrap().push((request, handler));
    }

    fn set_request_delay(&self, host: &str, port: u16, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .push((host.to_string(), port, delay));
    }
}
