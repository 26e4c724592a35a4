//! Plugin descriptor and registration

use crate::host::{ProcessorRegistry, WebService};
use crate::mappers::{mood_genre, tonal_rhythm};
use crate::services::{AcousticBrainzFetcher, Endpoint};
use abtag_common::AcousticBrainzConfig;
use std::sync::Arc;

pub const PLUGIN_NAME: &str = "AcousticBrainz";

/// Static plugin description shown by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: &'static str,
    pub authors: &'static [&'static str],
    pub description: &'static str,
    pub version: &'static str,
    pub license: &'static str,
    pub license_url: &'static str,
    /// Host API versions this plugin works with (TKEY support needs 1.4)
    pub api_versions: &'static [&'static str],
}

pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    name: PLUGIN_NAME,
    authors: &["Andrew Cook", "Sophist"],
    description: "Adds the following tags from the AcousticBrainz database: \
                  key (in ID3v2.3 format), beats per minute (BPM), genre, mood.",
    version: env!("CARGO_PKG_VERSION"),
    license: "GPL-2.0",
    license_url: "https://www.gnu.org/licenses/gpl-2.0.txt",
    api_versions: &["1.4.0"],
};

/// Register the request delay and both endpoint fetchers with the host
///
/// Processors run in registration order: high-level first, then low-level.
pub fn register(
    registry: &mut ProcessorRegistry,
    web_service: Arc<dyn WebService>,
    config: &AcousticBrainzConfig,
) {
    web_service.set_request_delay(&config.host, config.port, config.request_delay());

    registry.register(Arc::new(AcousticBrainzFetcher::new(
        Endpoint::HighLevel,
        mood_genre,
        web_service.clone(),
        config,
    )));
    registry.register(Arc::new(AcousticBrainzFetcher::new(
        Endpoint::LowLevel,
        tonal_rhythm,
        web_service,
        config,
    )));

    tracing::info!(
        plugin = PLUGIN_INFO.name,
        version = PLUGIN_INFO.version,
        host = %config.host,
        port = config.port,
        "Plugin registered"
    );
}
