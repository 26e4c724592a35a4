//! High-level endpoint: genre and mood classifier results

use super::object_field;
use crate::error::ABError;
use crate::host::{tags, AlbumHandle, Metadata};
use serde_json::Value;

const GENRE_PREFIX: &str = "genre_";
const MOOD_PREFIX: &str = "mood_";
/// Classifier values meaning "this class does not apply"
const NEGATIVE_PREFIX: &str = "not_";

/// Replace `genre` and `mood` with the positive classifier values
///
/// Each classifier under `highlevel` looks like
/// `"mood_happy": {"value": "happy", "probability": 0.8, ..}`. Values
/// starting with `not_` are dropped. A document without `highlevel` leaves
/// the track untouched.
pub fn mood_genre(
    _album: &dyn AlbumHandle,
    track: &mut Metadata,
    data: &Value,
) -> Result<(), ABError> {
    let Some(highlevel) = object_field(data, "highlevel") else {
        return Ok(());
    };

    let mut genres: Vec<String> = Vec::new();
    let mut moods: Vec<String> = Vec::new();

    for (name, classifier) in highlevel {
        let target = if name.starts_with(GENRE_PREFIX) {
            &mut genres
        } else if name.starts_with(MOOD_PREFIX) {
            &mut moods
        } else {
            continue;
        };

        let value = classifier
            .get("value")
            .and_then(Value::as_str)
            .ok_or_else(|| ABError::malformed(name, "missing string 'value'"))?;

        if !value.starts_with(NEGATIVE_PREFIX) && !target.iter().any(|v| v == value) {
            target.push(value.to_string());
        }
    }

    track.set_all(tags::GENRE, genres);
    track.set_all(tags::MOOD, moods);
    Ok(())
}
