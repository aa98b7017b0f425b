use chrono::DateTime;
use serde::Serialize;

use crate::constants::{OVERLAY_LAYER_NAME, RADIUS_PER_MAGNITUDE};
use crate::feed::{EarthquakeFeature, FeatureCollection};

/// Depth buckets used for marker fill, deepest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthBand {
    Red,
    DarkOrange,
    Gold,
    YellowGreen,
    OliveDrab,
    Green,
}

impl DepthBand {
    /// Thresholds are exclusive lower bounds: a depth of exactly 90 km is `DarkOrange`.
    pub fn from_depth(depth_km: f64) -> Self {
        if depth_km > 90.0 {
            DepthBand::Red
        } else if depth_km > 70.0 {
            DepthBand::DarkOrange
        } else if depth_km > 50.0 {
            DepthBand::Gold
        } else if depth_km > 30.0 {
            DepthBand::YellowGreen
        } else if depth_km > 10.0 {
            DepthBand::OliveDrab
        } else {
            DepthBand::Green
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            DepthBand::Red => "#FF0000",
            DepthBand::DarkOrange => "#FF8C00",
            DepthBand::Gold => "#FFD700",
            DepthBand::YellowGreen => "#ADFF2F",
            DepthBand::OliveDrab => "#9ACD32",
            DepthBand::Green => "#00FF00",
        }
    }
}

pub fn depth_color(depth_km: f64) -> &'static str {
    DepthBand::from_depth(depth_km).color()
}

/// Radius grows linearly with magnitude. Zero and negative magnitudes are passed through.
pub fn marker_radius(magnitude: f64) -> f64 {
    magnitude * RADIUS_PER_MAGNITUDE
}

/// Human-readable UTC rendering of an epoch-millisecond timestamp.
pub fn format_timestamp(time_ms: i64) -> String {
    match DateTime::from_timestamp_millis(time_ms) {
        Some(dt) => dt.format("%a %b %d %Y %H:%M:%S UTC").to_string(),
        None => format!("Invalid time ({} ms)", time_ms),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn popup_html(place: Option<&str>, time_ms: i64) -> String {
    format!(
        "<h3>{}</h3><hr><p>{}</p>",
        escape_html(place.unwrap_or("Unknown location")),
        format_timestamp(time_ms)
    )
}

/// Stroke styling shared by every marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: "#000",
            weight: 1,
            opacity: 1.0,
            fill_opacity: 0.65,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
    pub fill_color: &'static str,
    pub style: MarkerStyle,
    pub popup_html: String,
}

impl Marker {
    pub fn from_feature(feature: &EarthquakeFeature) -> Self {
        Marker {
            lat: feature.latitude,
            lng: feature.longitude,
            radius: marker_radius(feature.magnitude),
            fill_color: depth_color(feature.depth_km),
            style: MarkerStyle::default(),
            popup_html: popup_html(feature.place.as_deref(), feature.time_ms),
        }
    }
}

/// Overlay layer holding one marker per feature, in feed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLayer {
    pub name: String,
    pub markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn len(&self) -> usize {
        self.markers.len()
    }
}

pub fn build_marker_layer(collection: &FeatureCollection) -> MarkerLayer {
    MarkerLayer {
        name: OVERLAY_LAYER_NAME.to_string(),
        markers: collection.features.iter().map(Marker::from_feature).collect(),
    }
}
