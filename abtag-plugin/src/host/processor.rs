//! Track metadata processor registration

use super::{AlbumHandle, SharedMetadata};
use serde_json::Value;
use std::sync::Arc;

/// Per-track hook run by the host while an album loads
///
/// `track_node` and `release_node` are the host's source documents for the
/// track and its release.
pub trait TrackMetadataProcessor: Send + Sync {
    fn process(
        &self,
        album: Arc<dyn AlbumHandle>,
        track: SharedMetadata,
        track_node: &Value,
        release_node: &Value,
    );
}

/// Ordered list of registered track processors
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn TrackMetadataProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, processor: Arc<dyn TrackMetadataProcessor>) {
        self.processors.push(processor);
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run every processor for one track, in registration order
    pub fn run(
        &self,
        album: Arc<dyn AlbumHandle>,
        track: &SharedMetadata,
        track_node: &Value,
        release_node: &Value,
    ) {
        for processor in &self.processors {
            processor.process(album.clone(), track.clone(), track_node, release_node);
        }
    }
}
