// Feed: USGS summary of all earthquakes in the past week
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

// Server configuration
pub const DEFAULT_PORT: u16 = 3001;

// Map view
pub const DEFAULT_CENTER: (f64, f64) = (37.09, -95.71);
pub const DEFAULT_ZOOM: u8 = 5;
pub const MAP_CONTAINER_ID: &str = "map";

// Base tiles
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href='https://www.openstreetmap.org/copyright'>OpenStreetMap</a> contributors";

// Layer names shown in the layer control
pub const BASE_LAYER_NAME: &str = "Earthquake Map";
pub const OVERLAY_LAYER_NAME: &str = "Earthquakes";

// Marker scaling: radius in pixels per unit of magnitude
pub const RADIUS_PER_MAGNITUDE: f64 = 4.0;
