use serde::Serialize;

use crate::constants::{
    BASE_LAYER_NAME, DEFAULT_CENTER, DEFAULT_TILE_URL, DEFAULT_ZOOM, MAP_CONTAINER_ID,
    TILE_ATTRIBUTION,
};
use crate::markers::{DepthBand, MarkerLayer};

/// Everything the composer needs that would otherwise be a global.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub container_id: String,
    pub center: (f64, f64),
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub base_layer_name: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: MAP_CONTAINER_ID.to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
            base_layer_name: BASE_LAYER_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub container: String,
    pub center: [f64; 2],
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControl {
    pub base: Vec<String>,
    pub overlays: Vec<String>,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: &'static str,
    pub label: String,
}

// Lower bound of each legend row, shallowest first.
const LEGEND_DEPTHS: [i32; 6] = [-10, 10, 30, 50, 70, 90];

/// Static depth-to-color key, rendered once in the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: &'static str,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn depth_key() -> Self {
        let entries = LEGEND_DEPTHS
            .iter()
            .enumerate()
            .map(|(i, &lower)| {
                let label = match LEGEND_DEPTHS.get(i + 1) {
                    Some(upper) => format!("{}\u{2013}{}", lower, upper),
                    None => format!("{}+", lower),
                };
                // Sample just above the lower bound so each row picks its own band
                let color = DepthBand::from_depth(f64::from(lower) + 1.0).color();
                LegendEntry { color, label }
            })
            .collect();

        Legend {
            position: "bottomright",
            entries,
        }
    }

    pub fn render_html(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "<i style=\"background:{}; width: 12px; height: 12px; display: inline-block;\"></i> {}<br>",
                    entry.color, entry.label
                )
            })
            .collect()
    }
}

/// The fully composed map, ready to be handed to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub view: MapView,
    pub tile_layer: TileLayer,
    pub marker_layer: MarkerLayer,
    pub layer_control: LayerControl,
    pub legend: Legend,
    pub legend_html: String,
}

pub fn compose_map(config: &MapConfig, markers: MarkerLayer) -> MapDocument {
    let tile_layer = TileLayer {
        name: config.base_layer_name.clone(),
        url_template: config.tile_url.clone(),
        attribution: config.attribution.clone(),
    };

    let view = MapView {
        container: config.container_id.clone(),
        center: [config.center.0, config.center.1],
        zoom: config.zoom,
    };

    let layer_control = LayerControl {
        base: vec![tile_layer.name.clone()],
        overlays: vec![markers.name.clone()],
        collapsed: false,
    };

    let legend = Legend::depth_key();
    let legend_html = legend.render_html();

    MapDocument {
        view,
        tile_layer,
        marker_layer: markers,
        layer_control,
        legend,
        legend_html,
    }
}
