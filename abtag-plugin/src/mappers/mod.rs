//! Field mappers: copy AcousticBrainz document fields into track tags
//!
//! One mapper per endpoint. Mappers are not transactional: tags written
//! before an error stay written.

pub mod mood_genre;
pub mod tonal_rhythm;

pub use mood_genre::mood_genre;
pub use tonal_rhythm::tonal_rhythm;

use crate::error::ABError;
use crate::host::{AlbumHandle, Metadata};
use serde_json::Value;

/// Applies one parsed document to a track's metadata
pub type FieldMapper = fn(&dyn AlbumHandle, &mut Metadata, &Value) -> Result<(), ABError>;

/// `data[key]` if it is an object
fn object_field<'a>(data: &'a Value, key: &str) -> Option<&'a serde_json::Map<String, Value>> {
    data.get(key).and_then(Value::as_object)
}
