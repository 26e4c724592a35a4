//! AcousticBrainz plugin errors

use thiserror::Error;

/// Errors raised while fetching or applying AcousticBrainz data
///
/// None of these ever reach the host: the fetcher logs and swallows them.
#[derive(Debug, Clone, Error)]
pub enum ABError {
    /// Network communication error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Recording not found in AcousticBrainz database
    #[error("Recording not found in AcousticBrainz: {0}")]
    RecordingNotFound(String),

    /// AcousticBrainz API returned error response
    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    /// Failed to parse API response JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A document field is present but has the wrong shape
    #[error("Malformed field '{field}': {reason}")]
    MalformedField { field: String, reason: String },

    /// Track metadata could not be locked for writing
    #[error("Track metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// Field mapper panicked while applying a document
    #[error("Field mapper panicked: {0}")]
    MapperPanicked(String),
}

impl ABError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        ABError::MalformedField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ABError {
    fn from(e: serde_json::Error) -> Self {
        ABError::ParseError(e.to_string())
    }
}
