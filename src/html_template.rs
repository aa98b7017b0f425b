use anyhow::{Context, Result};
use rust_embed::RustEmbed;

use crate::map_composer::MapDocument;

#[derive(RustEmbed)]
#[folder = "frontend/"]
pub struct Asset;

fn embedded_text(name: &str) -> Result<String> {
    let file = Asset::get(name).with_context(|| format!("Embedded asset {} is missing", name))?;
    String::from_utf8(file.data.into_owned())
        .with_context(|| format!("Embedded asset {} is not UTF-8", name))
}

/// Serializes the document for inlining into a `<script>` block.
fn inline_json(document: &MapDocument) -> Result<String> {
    let json = serde_json::to_string(document).context("Failed to serialize map document")?;
    // No `<` may reach the HTML tokenizer: `</script>` would close the block
    // and `<!--` would switch it into escaped script data
    Ok(json.replace('<', "\\u003c"))
}

/// Builds the self-contained page: Leaflet from the CDN, our style and driver inlined.
pub fn render_page(document: &MapDocument) -> Result<String> {
    let html = PAGE_HTML
        .replace("/* STYLE_PLACEHOLDER */", &embedded_text("style.css")?)
        .replace("/* SCRIPT_PLACEHOLDER */", &embedded_text("map.js")?)
        .replace("<!-- CONTAINER_ID -->", &document.view.container)
        .replace("<!-- EVENT_COUNT -->", &document.marker_layer.len().to_string())
        .replace("/* MAP_DATA_PLACEHOLDER */", &inline_json(document)?);
    Ok(html)
}

// HTML template for the map page
const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>QuakeMap - <!-- EVENT_COUNT --> earthquakes</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <style>
/* STYLE_PLACEHOLDER */
    </style>
</head>
<body>
    <div id="<!-- CONTAINER_ID -->"></div>
    <script id="map-data" type="application/json">/* MAP_DATA_PLACEHOLDER */</script>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script>
/* SCRIPT_PLACEHOLDER */
    </script>
</body>
</html>
"#;
