use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{DEFAULT_CENTER, DEFAULT_FEED_URL, DEFAULT_PORT, DEFAULT_TILE_URL, DEFAULT_ZOOM};
use crate::map_composer::MapConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub feed_url: String,
    pub port: u16,
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
    pub tile_url: String,
    pub auto_open_browser: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            port: DEFAULT_PORT,
            center_lat: DEFAULT_CENTER.0,
            center_lng: DEFAULT_CENTER.1,
            zoom: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
            auto_open_browser: false,
        }
    }
}

fn parse_value<T: std::str::FromStr>(map: &HashMap<String, String>, key: &str, target: &mut T) {
    if let Some(raw) = map.get(key) {
        match raw.parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => warn!(key, value = %raw, "ignoring unparsable setting"),
        }
    }
}

impl Settings {
    /// Loads `key = value` pairs from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = Settings::default();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(settings);
        }

        let file = File::open(path).context("Failed to open config file")?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(
                    key.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }

        if let Some(feed_url) = config_map.get("feed_url") {
            settings.feed_url = feed_url.clone();
        }
        if let Some(tile_url) = config_map.get("tile_url") {
            settings.tile_url = tile_url.clone();
        }
        parse_value(&config_map, "port", &mut settings.port);
        parse_value(&config_map, "center_lat", &mut settings.center_lat);
        parse_value(&config_map, "center_lng", &mut settings.center_lng);
        parse_value(&config_map, "zoom", &mut settings.zoom);
        parse_value(&config_map, "auto_open_browser", &mut settings.auto_open_browser);

        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# QuakeMap Configuration File\n");
        content.push_str(&format!("feed_url = \"{}\"\n", self.feed_url));
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("center_lat = {}\n", self.center_lat));
        content.push_str(&format!("center_lng = {}\n", self.center_lng));
        content.push_str(&format!("zoom = {}\n", self.zoom));
        content.push_str(&format!("tile_url = \"{}\"\n", self.tile_url));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));

        std::fs::write(path, content).context("Failed to write to config file")?;
        Ok(())
    }

    pub fn to_map_config(&self) -> MapConfig {
        MapConfig {
            center: (self.center_lat, self.center_lng),
            zoom: self.zoom,
            tile_url: self.tile_url.clone(),
            ..MapConfig::default()
        }
    }

    /// `quakemap.ini` next to the executable (or the crate root under `cargo run`).
    pub fn default_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push("quakemap.ini");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.port, 3001);
        assert_eq!(settings.feed_url, DEFAULT_FEED_URL);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quakemap.ini");
        let settings = Settings {
            feed_url: "https://example.org/day.geojson".to_string(),
            port: 8080,
            center_lat: 35.5,
            center_lng: 139.25,
            zoom: 6,
            auto_open_browser: true,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn comments_and_bad_values_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quakemap.ini");
        std::fs::write(&path, "# comment\n\nport = not-a-port\nzoom = 3\n").unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.zoom, 3);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quakemap.ini");
        std::fs::write(&path, "port = 4000\n").unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.port, 4000);
        assert!(!settings.auto_open_browser);
        assert_eq!(settings.tile_url, DEFAULT_TILE_URL);
    }

    #[test]
    fn map_config_takes_view_from_settings() {
        let settings = Settings {
            center_lat: 10.0,
            center_lng: 20.0,
            zoom: 9,
            ..Settings::default()
        };
        let config = settings.to_map_config();
        assert_eq!(config.center, (10.0, 20.0));
        assert_eq!(config.zoom, 9);
        assert_eq!(config.container_id, "map");
    }
}
