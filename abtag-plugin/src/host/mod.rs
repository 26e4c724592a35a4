//! Host application interfaces
//!
//! The plugin only talks to the host through these traits. Each trait has a
//! reference implementation here (`Album`, `Metadata`, `ProcessorRegistry`;
//! the HTTP transport lives in `services`).

pub mod album;
pub mod metadata;
pub mod processor;
pub mod webservice;

pub use album::{Album, AlbumHandle};
pub use metadata::{tags, Metadata, SharedMetadata};
pub use processor::{ProcessorRegistry, TrackMetadataProcessor};
pub use webservice::{DownloadRequest, Reply, Response, ResponseHandler, WebService};
