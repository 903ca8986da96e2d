//! Contract for stored values.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A typed value persisted by [`JsonStorage`](crate::JsonStorage).
///
/// `FIELDS` is the explicit schema the codec consumes: the canonical
/// top-level field names as they appear in serialized form. Incoming keys
/// are matched against this list case-insensitively, and names missing from
/// a document are filled from `Default::default()` before the typed decode,
/// so partially written files and older documents still load.
///
/// `Default` also supplies the value seeded when the backing file is
/// absent or unreadable.
pub trait StoredValue: Serialize + DeserializeOwned + Default + Clone {
    /// Canonical top-level field names in serialized form.
    const FIELDS: &'static [&'static str];
}
