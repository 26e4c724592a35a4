//! Low-level endpoint: musical key and tempo

use super::object_field;
use crate::error::ABError;
use crate::host::{tags, AlbumHandle, Metadata};
use serde_json::Value;
use tracing::debug;

/// Suffix marking a minor key (ID3v2.3 TKEY convention)
const MINOR_SUFFIX: &str = "m";

/// Write `key` from `tonal` and `bpm` from `rhythm`, when present
pub fn tonal_rhythm(
    _album: &dyn AlbumHandle,
    track: &mut Metadata,
    data: &Value,
) -> Result<(), ABError> {
    if let Some(tonal) = object_field(data, "tonal") {
        if let Some(key_key) = tonal.get("key_key") {
            let mut key = key_key
                .as_str()
                .ok_or_else(|| ABError::malformed("tonal.key_key", "expected a string"))?
                .to_string();
            if tonal.get("key_scale").and_then(Value::as_str) == Some("minor") {
                key.push_str(MINOR_SUFFIX);
            }

            track.set(tags::KEY, key.as_str());
            debug!(
                title = track.get(tags::TITLE).unwrap_or_default(),
                key = %key,
                "Track key from AcousticBrainz"
            );
        }
    }

    if let Some(rhythm) = object_field(data, "rhythm") {
        if let Some(bpm) = rhythm.get("bpm") {
            let bpm = bpm
                .as_f64()
                .ok_or_else(|| ABError::malformed("rhythm.bpm", format!("expected a number, got {}", bpm)))?;
            let bpm = round_bpm(bpm)?;

            track.set(tags::BPM, bpm.to_string());
            debug!(
                title = track.get(tags::TITLE).unwrap_or_default(),
                bpm,
                "Track tempo from AcousticBrainz"
            );
        }
    }

    Ok(())
}

/// Add 0.5 and truncate toward zero
fn round_bpm(bpm: f64) -> Result<i64, ABError> {
    if !bpm.is_finite() || bpm.abs() > i64::MAX as f64 {
        return Err(ABError::malformed("rhythm.bpm", format!("out of range: {}", bpm)));
    }
    Ok((bpm + 0.5).trunc() as i64)
}
