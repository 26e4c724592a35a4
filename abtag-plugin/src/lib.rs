//! AcousticBrainz track enrichment for a tagging host
//!
//! Adds key, BPM, genre and mood tags to tracks by querying the
//! AcousticBrainz high-level and low-level endpoints for each track's
//! MusicBrainz recording id.
//!
//! The host side (album loading, track metadata, web transport) is expressed
//! as traits in [`host`]; reference implementations of each live alongside
//! them so the plugin can run outside a real tagging application.

pub mod error;
pub mod host;
pub mod mappers;
pub mod plugin;
pub mod services;

pub use crate::error::ABError;
pub use crate::host::{
    Album, AlbumHandle, Metadata, ProcessorRegistry, SharedMetadata, TrackMetadataProcessor,
    WebService,
};
pub use crate::plugin::{register, PLUGIN_INFO};
pub use crate::services::{AcousticBrainzFetcher, Endpoint, HttpWebService};
