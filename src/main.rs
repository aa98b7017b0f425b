use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod constants;
mod feed;
mod html_template;
mod map_composer;
mod markers;
mod server;
mod settings;
mod utils;

use cli::Args;
use feed::load_feed;
use html_template::render_page;
use map_composer::compose_map;
use markers::build_marker_layer;
use server::{start_server, AppState};
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    println!("🌋 QuakeMap v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = args.config_path();
    let mut settings = Settings::load_from(&config_path)
        .with_context(|| format!("Failed to load settings from {}", config_path.display()))?;
    args.apply_to(&mut settings);
    if args.save_config {
        settings.save_to(&config_path)?;
        info!(path = %config_path.display(), "settings saved");
    }

    // The only suspension point that matters: everything after this is synchronous
    let source = args.feed_source(&settings);
    let collection = load_feed(&source)
        .await
        .with_context(|| format!("Failed to load earthquake feed from {}", source))?;

    if collection.is_empty() {
        warn!("feed contained no earthquakes, the map will have no markers");
    }

    let layer = build_marker_layer(&collection);
    info!(markers = layer.len(), "markers built");

    let document = compose_map(&settings.to_map_config(), layer);
    let page = render_page(&document)?;

    if let Some(output) = args.output {
        tokio::fs::write(&output, &page)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!(
            "🗺️  Map with {} earthquakes written to {}",
            document.marker_layer.len(),
            output.display()
        );
        return Ok(());
    }

    println!(
        "🗺️  {} earthquakes ready, starting HTTP server on port {}",
        document.marker_layer.len(),
        settings.port
    );
    let auto_open = settings.auto_open_browser;
    let state = AppState::new(&document, page)?;
    start_server(state, settings.port, |url| {
        if auto_open {
            if let Err(e) = utils::open_browser(url) {
                warn!(error = %e, "could not open browser");
            }
        }
    })
    .await
}
