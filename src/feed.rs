use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("feed server answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read feed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed feed document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the GeoJSON document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::Url(url) => write!(f, "{}", url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// Wire format of the USGS GeoJSON summary feed. Only the fields we render are
// declared; everything else in the document is ignored.
#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    properties: RawProperties,
    geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    place: Option<String>,
    mag: Option<f64>,
    time: i64,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    // [longitude, latitude, depth_km]
    coordinates: [f64; 3],
}

/// One earthquake event as consumed by the marker mapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthquakeFeature {
    pub place: Option<String>,
    pub time_ms: i64,
    pub magnitude: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
}

impl From<RawFeature> for EarthquakeFeature {
    fn from(raw: RawFeature) -> Self {
        let [longitude, latitude, depth_km] = raw.geometry.coordinates;
        EarthquakeFeature {
            place: raw.properties.place,
            time_ms: raw.properties.time,
            // USGS publishes `null` for some unreviewed events; treat as zero
            magnitude: raw.properties.mag.unwrap_or(0.0),
            longitude,
            latitude,
            depth_km,
        }
    }
}

/// Ordered sequence of features, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureCollection {
    pub features: Vec<EarthquakeFeature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Parses a GeoJSON FeatureCollection. Any malformed feature fails the whole document.
pub fn parse_feed(body: &str) -> Result<FeatureCollection, FeedError> {
    let raw: RawCollection = serde_json::from_str(body)?;
    Ok(FeatureCollection {
        features: raw.features.into_iter().map(EarthquakeFeature::from).collect(),
    })
}

pub struct FeedLoader {
    client: Client,
    url: String,
}

impl FeedLoader {
    pub fn new(url: impl Into<String>) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(concat!("quakemap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(FeedLoader {
            client,
            url: url.into(),
        })
    }

    /// Issues a single GET for the feed. No retry and no timeout.
    pub async fn fetch(&self) -> Result<FeatureCollection, FeedError> {
        info!(url = %self.url, "fetching earthquake feed");
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "feed body received");
        parse_feed(&body)
    }
}

pub async fn load_feed_file(path: &Path) -> Result<FeatureCollection, FeedError> {
    info!(path = %path.display(), "reading earthquake feed from file");
    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_feed(&body)
}

pub async fn load_feed(source: &FeedSource) -> Result<FeatureCollection, FeedError> {
    let collection = match source {
        FeedSource::Url(url) => FeedLoader::new(url.clone())?.fetch().await?,
        FeedSource::File(path) => load_feed_file(path).await?,
    };
    info!(features = collection.len(), "feed loaded");
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::io::Write;
    use tokio::net::TcpListener;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"title": "USGS All Earthquakes, Past Week", "count": 3},
        "features": [
            {"type": "Feature",
             "properties": {"mag": 5.0, "place": "Test", "time": 1700000000000, "tsunami": 0},
             "geometry": {"type": "Point", "coordinates": [-150.1, 61.2, 95.0]},
             "id": "ak1"},
            {"type": "Feature",
             "properties": {"mag": null, "place": null, "time": 0},
             "geometry": {"type": "Point", "coordinates": [-117.5, 35.7, -1.2]},
             "id": "ci2"},
            {"type": "Feature",
             "properties": {"mag": 1.3, "place": "10km NE of Example", "time": 1699999999000},
             "geometry": {"type": "Point", "coordinates": [-122.8, 38.8, 2.5]},
             "id": "nc3"}
        ]
    }"#;

    #[test]
    fn parses_features_in_feed_order() {
        let collection = parse_feed(SAMPLE).unwrap();
        assert_eq!(collection.len(), 3);

        let first = &collection.features[0];
        assert_eq!(first.place.as_deref(), Some("Test"));
        assert_eq!(first.time_ms, 1_700_000_000_000);
        assert_eq!(first.magnitude, 5.0);
        assert_eq!(first.longitude, -150.1);
        assert_eq!(first.latitude, 61.2);
        assert_eq!(first.depth_km, 95.0);

        assert_eq!(
            collection.features[2].place.as_deref(),
            Some("10km NE of Example")
        );
    }

    #[test]
    fn null_magnitude_and_place_are_tolerated() {
        let collection = parse_feed(SAMPLE).unwrap();
        let second = &collection.features[1];
        assert_eq!(second.magnitude, 0.0);
        assert!(second.place.is_none());
        assert_eq!(second.depth_km, -1.2);
    }

    #[test]
    fn empty_collection_is_valid() {
        let collection = parse_feed(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn missing_time_fails_the_document() {
        let body = r#"{"features":[{"properties":{"mag":1.0,"place":"x"},
            "geometry":{"coordinates":[1.0,2.0,3.0]}}]}"#;
        assert!(matches!(parse_feed(body), Err(FeedError::Parse(_))));
    }

    #[test]
    fn two_element_coordinates_fail_the_document() {
        let body = r#"{"features":[{"properties":{"mag":1.0,"place":"x","time":1},
            "geometry":{"coordinates":[1.0,2.0]}}]}"#;
        assert!(matches!(parse_feed(body), Err(FeedError::Parse(_))));
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        assert!(matches!(
            parse_feed("<html>502 Bad Gateway</html>"),
            Err(FeedError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn loads_feed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = FeedSource::File(file.path().to_path_buf());
        let collection = load_feed(&source).await.unwrap();
        assert_eq!(collection.len(), 3);
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let source = FeedSource::File(PathBuf::from("/nonexistent/quakes.geojson"));
        let err = load_feed(&source).await.unwrap_err();
        assert!(matches!(err, FeedError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/quakes.geojson"));
    }

    // Serves `router` on an ephemeral local port and returns its base URL
    async fn spawn_feed_server(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn fetches_and_parses_feed_over_http() {
        let router = Router::new().route("/all_week.geojson", get(|| async { SAMPLE }));
        let base = spawn_feed_server(router).await;

        let source = FeedSource::Url(format!("{}/all_week.geojson", base));
        let collection = load_feed(&source).await.unwrap();
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.features[0].place.as_deref(), Some("Test"));
    }

    #[tokio::test]
    async fn error_status_is_reported_without_parsing() {
        let router = Router::new().route(
            "/all_week.geojson",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let base = spawn_feed_server(router).await;

        let loader = FeedLoader::new(format!("{}/all_week.geojson", base)).unwrap();
        let err = loader.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Status(s) if s == StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn garbage_body_over_http_is_a_parse_error() {
        let router = Router::new().route("/feed", get(|| async { "not json" }));
        let base = spawn_feed_server(router).await;

        let err = load_feed(&FeedSource::Url(format!("{}/feed", base)))
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        // Bind then drop to get a local port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = load_feed(&FeedSource::Url(format!("http://{}/feed", addr)))
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Request(_)));
    }
}
