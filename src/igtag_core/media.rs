use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// One photo or video entry from the archive's JSON metadata.
#[derive(Deserialize, Debug, Clone)]
pub struct MediaRecord {
    /// Source file. Relative to the archive root as read, rewritten to include
    /// the root by [`collect_media`](crate::igtag_core::collect_media).
    pub uri: PathBuf,
    pub creation_timestamp: i64,
    #[serde(default)]
    pub title: Option<String>,
    /// Free-form mapping, e.g. `{"photo_metadata": {"exif_data": [...]}}`.
    #[serde(default)]
    pub media_metadata: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl MediaRecord {
    /// Trimmed title, or an empty string when there is none.
    pub fn description(&self) -> &str {
        self.title.as_deref().unwrap_or_default().trim()
    }

    /// Extension of the source file including the leading dot, or empty.
    pub fn extension(&self) -> String {
        self.uri
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Coordinates from the first `exif_data` entry of the first metadata value.
    ///
    /// Any missing layer, or a non-numeric coordinate, means no GPS data at all.
    pub fn gps(&self) -> Option<GpsCoordinates> {
        let first = self.media_metadata.as_ref()?.as_object()?.values().next()?;
        let exif = first.get("exif_data")?.as_array()?.first()?;
        Some(GpsCoordinates {
            latitude: exif.get("latitude")?.as_f64()?,
            longitude: exif.get("longitude")?.as_f64()?,
        })
    }
}
