//! Schema migrations over raw content documents

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::content::schema::{ElementKind, GALLERY_COLUMNS};
use crate::domain::content::walk::for_each_element_mut;

/// Coerce gallery column counts stored as numeric strings into integers.
///
/// Only the `galleryColumns` field of `gallery` elements is touched; strings
/// that do not hold a base-10 integer are left as they are. Running the
/// migration again on its own output reports `changed == false`.
#[instrument(level = "debug", skip(document))]
pub fn migrate_gallery_column_count(mut document: Value) -> (Value, bool) {
    let mut changed = false;
    let gallery = ElementKind::Gallery.as_str();

    for_each_element_mut(&mut document, |path, element| {
        let Some(map) = element.as_object_mut() else {
            return;
        };
        if map.get("type").and_then(Value::as_str) != Some(gallery) {
            return;
        }
        let Some(slot) = map.get_mut(GALLERY_COLUMNS) else {
            return;
        };
        if let Some(count) = slot.as_str().and_then(|s| s.trim().parse::<i64>().ok()) {
            debug!("{}: {} {:?} -> {}", path, GALLERY_COLUMNS, slot, count);
            *slot = Value::from(count);
            changed = true;
        }
    });

    (document, changed)
}
