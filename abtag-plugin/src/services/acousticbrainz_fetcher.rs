//! Per-track AcousticBrainz lookup
//!
//! One fetcher is registered per endpoint. For each track it records a
//! pending request on the album, queues `GET /{recording_id}/{endpoint}` and
//! applies the returned document with its field mapper.
//!
//! **Pending-request contract:** every `begin_request` is matched by exactly
//! one `end_request`, whatever happens to the response. The release lives in
//! [`PendingRequest`]'s `Drop`, so it also runs if the transport drops the
//! handler without calling it.
//!
//! The response handler runs inside the transport's dispatch and never lets
//! an error or panic escape; failures are logged and the track keeps
//! whatever tags it already had.

use crate::error::ABError;
use crate::host::{
    tags, AlbumHandle, DownloadRequest, Metadata, Response, SharedMetadata,
    TrackMetadataProcessor, WebService,
};
use crate::mappers::FieldMapper;
use abtag_common::AcousticBrainzConfig;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// AcousticBrainz analysis tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Classifier output: genre, mood
    HighLevel,
    /// Signal measurements: key, tempo
    LowLevel,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::HighLevel => "high-level",
            Endpoint::LowLevel => "low-level",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outstanding request on an album; released on drop
struct PendingRequest {
    album: Arc<dyn AlbumHandle>,
}

impl PendingRequest {
    fn begin(album: Arc<dyn AlbumHandle>) -> Self {
        album.begin_request();
        Self { album }
    }

    fn album(&self) -> &dyn AlbumHandle {
        self.album.as_ref()
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        self.album.end_request();
    }
}

/// Track processor fetching one AcousticBrainz endpoint
pub struct AcousticBrainzFetcher {
    endpoint: Endpoint,
    mapper: FieldMapper,
    web_service: Arc<dyn WebService>,
    host: String,
    port: u16,
}

impl AcousticBrainzFetcher {
    pub fn new(
        endpoint: Endpoint,
        mapper: FieldMapper,
        web_service: Arc<dyn WebService>,
        config: &AcousticBrainzConfig,
    ) -> Self {
        Self {
            endpoint,
            mapper,
            web_service,
            host: config.host.clone(),
            port: config.port,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    fn request_for(&self, recording_id: &Uuid) -> DownloadRequest {
        DownloadRequest {
            host: self.host.clone(),
            port: self.port,
            path: format!("/{}/{}", recording_id, self.endpoint),
            priority: true,
        }
    }
}

impl TrackMetadataProcessor for AcousticBrainzFetcher {
    fn process(
        &self,
        album: Arc<dyn AlbumHandle>,
        track: SharedMetadata,
        _track_node: &Value,
        _release_node: &Value,
    ) {
        let recording_id = match recording_id(&track) {
            Ok(id) => id,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Skipping AcousticBrainz lookup");
                return;
            }
        };

        let request = self.request_for(&recording_id);
        debug!(
            endpoint = %self.endpoint,
            recording_id = %recording_id,
            path = %request.path,
            "Querying AcousticBrainz"
        );

        let pending = PendingRequest::begin(album);
        let endpoint = self.endpoint;
        let mapper = self.mapper;

        self.web_service.download(
            request,
            Box::new(move |response: Response| {
                handle_response(endpoint, mapper, &recording_id, pending.album(), &track, response);
                drop(pending);
            }),
        );
    }
}

/// Read and validate the track's MusicBrainz recording id
fn recording_id(track: &SharedMetadata) -> Result<Uuid, ABError> {
    let metadata = track
        .lock()
        .map_err(|e| ABError::MetadataUnavailable(e.to_string()))?;
    let raw = metadata
        .get(tags::RECORDING_ID)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ABError::malformed(tags::RECORDING_ID, "not set"))?;

    Uuid::parse_str(raw)
        .map_err(|e| ABError::malformed(tags::RECORDING_ID, format!("'{}' is not a UUID: {}", raw, e)))
}

fn handle_response(
    endpoint: Endpoint,
    mapper: FieldMapper,
    recording_id: &Uuid,
    album: &dyn AlbumHandle,
    track: &SharedMetadata,
    response: Response,
) {
    if let Some(e) = response.error {
        error!(
            endpoint = %endpoint,
            recording_id = %recording_id,
            url = %response.reply.url,
            error = %e,
            "Network error retrieving AcousticBrainz data"
        );
        return;
    }

    match apply_document(mapper, album, track, &response.body) {
        Ok(()) => debug!(
            endpoint = %endpoint,
            recording_id = %recording_id,
            "AcousticBrainz data applied"
        ),
        Err(e) => error!(
            endpoint = %endpoint,
            recording_id = %recording_id,
            error = %e,
            "Error handling AcousticBrainz data"
        ),
    }
}

fn apply_document(
    mapper: FieldMapper,
    album: &dyn AlbumHandle,
    track: &SharedMetadata,
    body: &str,
) -> Result<(), ABError> {
    let data: Value = serde_json::from_str(body)?;
    let mut metadata = track
        .lock()
        .map_err(|e| ABError::MetadataUnavailable(e.to_string()))?;

    // Caught while the guard is held, so a panicking mapper does not poison the track
    let metadata: &mut Metadata = &mut metadata;
    panic::catch_unwind(AssertUnwindSafe(|| mapper(album, metadata, &data)))
        .map_err(|payload| ABError::MapperPanicked(panic_message(payload.as_ref())))?
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
