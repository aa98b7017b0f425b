use anyhow::{Context, Result};
use axum::body::Bytes;

use crate::map_composer::MapDocument;

// Immutable after startup: the feed is fetched once and never refreshed, so
// every response body is rendered up front and shared by reference count
#[derive(Clone)]
pub struct AppState {
    pub page: Bytes,
    pub map_json: Bytes,
    pub markers_json: Bytes,
    pub legend_json: Bytes,
}

impl AppState {
    pub fn new(document: &MapDocument, page: String) -> Result<Self> {
        let map_json = serde_json::to_vec(document).context("Failed to serialize map document")?;
        let markers_json = serde_json::to_vec(&document.marker_layer)
            .context("Failed to serialize marker layer")?;
        let legend_json = serde_json::to_vec(&document.legend.entries)
            .context("Failed to serialize legend")?;

        Ok(Self {
            page: Bytes::from(page),
            map_json: Bytes::from(map_json),
            markers_json: Bytes::from(markers_json),
            legend_json: Bytes::from(legend_json),
        })
    }
}
