use clap::Parser;
use std::path::PathBuf;

use crate::feed::FeedSource;
use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "quakemap", version, about = "Render the USGS earthquake feed on a Leaflet map")]
pub struct Args {
    /// GeoJSON feed to fetch (ignored when --feed-file is given)
    #[arg(long, env = "QUAKEMAP_FEED_URL")]
    pub feed_url: Option<String>,

    /// Read the feed from a local GeoJSON file instead of the network
    #[arg(long)]
    pub feed_file: Option<PathBuf>,

    /// Write a self-contained HTML page here and exit instead of serving
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[arg(long, env = "QUAKEMAP_PORT")]
    pub port: Option<u16>,

    /// Open the map in the default browser once the server is up
    #[arg(long)]
    pub open: bool,

    /// Settings file (defaults to quakemap.ini next to the executable)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Persist the effective settings back to the settings file
    #[arg(long)]
    pub save_config: bool,
}

impl Args {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Settings::default_path)
    }

    /// Flags win over the settings file.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(ref url) = self.feed_url {
            settings.feed_url = url.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if self.open {
            settings.auto_open_browser = true;
        }
    }

    pub fn feed_source(&self, settings: &Settings) -> FeedSource {
        match self.feed_file {
            Some(ref path) => FeedSource::File(path.clone()),
            None => FeedSource::Url(settings.feed_url.clone()),
        }
    }
}
