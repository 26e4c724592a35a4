//! reqwest-backed web service
//!
//! Requests go through two queues. A single dispatcher task drains them,
//! always preferring the priority queue, and hands each job to a lane task
//! owned by its destination. A lane keeps the same two queues and waits out
//! the delay registered for its destination, so a throttled host never holds
//! up requests to another one.
//! Once throttling allows, each request runs on its own task, and the handler
//! is called from that task.

use crate::error::ABError;
use crate::host::{DownloadRequest, Reply, Response, ResponseHandler, WebService};
use abtag_common::AcousticBrainzConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};

type Destination = (String, u16);

struct Job {
    request: DownloadRequest,
    handler: ResponseHandler,
}

/// Minimum spacing between requests to one destination
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Web service rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Per-destination request delays
#[derive(Default)]
struct RequestDelays {
    limiters: StdMutex<HashMap<Destination, Arc<RateLimiter>>>,
}

impl RequestDelays {
    fn set(&self, host: &str, port: u16, delay: Duration) {
        if let Ok(mut limiters) = self.limiters.lock() {
            limiters.insert((host.to_string(), port), Arc::new(RateLimiter::new(delay)));
        }
    }

    fn get(&self, host: &str, port: u16) -> Option<Arc<RateLimiter>> {
        self.limiters
            .lock()
            .ok()?
            .get(&(host.to_string(), port))
            .cloned()
    }
}

/// HTTP transport implementing [`WebService`]
pub struct HttpWebService {
    priority_tx: mpsc::UnboundedSender<Job>,
    normal_tx: mpsc::UnboundedSender<Job>,
    delays: Arc<RequestDelays>,
}

impl HttpWebService {
    /// Build the client and start the dispatcher
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &AcousticBrainzConfig) -> Result<Self, ABError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ABError::NetworkError(format!("No tokio runtime for web service: {}", e)))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ABError::NetworkError(e.to_string()))?;

        let (priority_tx, priority_rx) = mpsc::unbounded_channel();
        let (normal_tx, normal_rx) = mpsc::unbounded_channel();
        let delays = Arc::new(RequestDelays::default());

        runtime.spawn(dispatch(client, delays.clone(), priority_rx, normal_rx));

        tracing::info!(
            user_agent = %config.user_agent,
            timeout_secs = config.timeout_secs,
            "HTTP web service started"
        );

        Ok(Self {
            priority_tx,
            normal_tx,
            delays,
        })
    }
}

impl WebService for HttpWebService {
    fn download(&self, request: DownloadRequest, handler: ResponseHandler) {
        let queue = if request.priority {
            &self.priority_tx
        } else {
            &self.normal_tx
        };

        if let Err(mpsc::error::SendError(job)) = queue.send(Job { request, handler }) {
            let url = job.request.url();
            (job.handler)(Response {
                body: String::new(),
                reply: Reply { status: None, url },
                error: Some(ABError::NetworkError("web service stopped".to_string())),
            });
        }
    }

    fn set_request_delay(&self, host: &str, port: u16, delay: Duration) {
        tracing::debug!(host, port, delay_ms = delay.as_millis() as u64, "Request delay registered");
        self.delays.set(host, port, delay);
    }
}

/// Queues feeding one destination's lane task
struct Lane {
    priority_tx: mpsc::UnboundedSender<Job>,
    normal_tx: mpsc::UnboundedSender<Job>,
}

impl Lane {
    fn spawn(destination: Destination, client: reqwest::Client, delays: Arc<RequestDelays>) -> Self {
        let (priority_tx, priority_rx) = mpsc::unbounded_channel();
        let (normal_tx, normal_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_lane(destination, client, delays, priority_rx, normal_rx));
        Self {
            priority_tx,
            normal_tx,
        }
    }

    fn push(&self, job: Job) {
        let queue = if job.request.priority {
            &self.priority_tx
        } else {
            &self.normal_tx
        };
        // A dropped job drops its handler, which the caller observes
        let _ = queue.send(job);
    }
}

async fn dispatch(
    client: reqwest::Client,
    delays: Arc<RequestDelays>,
    mut priority_rx: mpsc::UnboundedReceiver<Job>,
    mut normal_rx: mpsc::UnboundedReceiver<Job>,
) {
    let mut lanes: HashMap<Destination, Lane> = HashMap::new();

    loop {
        let job = tokio::select! {
            biased;
            Some(job) = priority_rx.recv() => job,
            Some(job) = normal_rx.recv() => job,
            else => break,
        };

        let destination = (job.request.host.clone(), job.request.port);
        lanes
            .entry(destination.clone())
            .or_insert_with(|| Lane::spawn(destination, client.clone(), delays.clone()))
            .push(job);
    }

    tracing::debug!("HTTP web service dispatcher stopped");
}

/// Serve one destination, priority jobs first, waiting out its delay
async fn run_lane(
    destination: Destination,
    client: reqwest::Client,
    delays: Arc<RequestDelays>,
    mut priority_rx: mpsc::UnboundedReceiver<Job>,
    mut normal_rx: mpsc::UnboundedReceiver<Job>,
) {
    let (host, port) = destination;

    loop {
        let job = tokio::select! {
            biased;
            Some(job) = priority_rx.recv() => job,
            Some(job) = normal_rx.recv() => job,
            else => break,
        };

        if let Some(limiter) = delays.get(&host, port) {
            limiter.wait().await;
        }

        let client = client.clone();
        tokio::spawn(async move {
            let response = perform(&client, &job.request).await;
            (job.handler)(response);
        });
    }
}

async fn perform(client: &reqwest::Client, request: &DownloadRequest) -> Response {
    let url = request.url();
    tracing::debug!(url = %url, priority = request.priority, "HTTP GET");

    let mut reply = Reply {
        status: None,
        url: url.clone(),
    };

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => return failed(reply, ABError::NetworkError(e.to_string())),
    };

    let status = response.status();
    reply.status = Some(status.as_u16());

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return failed(reply, ABError::NetworkError(e.to_string())),
    };

    let error = if status == reqwest::StatusCode::NOT_FOUND {
        Some(ABError::RecordingNotFound(request.path.clone()))
    } else if !status.is_success() {
        Some(ABError::ApiError(status.as_u16(), body.clone()))
    } else {
        None
    };

    Response { body, reply, error }
}

fn failed(reply: Reply, error: ABError) -> Response {
    Response {
        body: String::new(),
        reply,
        error: Some(error),
    }
}
