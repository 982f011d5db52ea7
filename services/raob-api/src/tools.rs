//! The four sounding tools.
//!
//! Each tool returns a [`ToolOutcome`]. Missing observations, unusable
//! profiles and disabled publishing are normal outcomes reported to the
//! caller; everything else is a `RaobError`.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use raob_common::{RaobError, RaobResult, Station};
use renderer::{render_hodograph, render_skewt, HodographConfig, SkewTConfig};
use sounding::{
    derive_indices, parcel_path, sanitize_thermo, sanitize_wind, wind_components, IndicesReport,
};
use storage::{ArtifactPath, ArtifactPublisher};

use crate::upstream::{SoundingSource, StationSource};

const PUBLISHING_DISABLED: &str = "Plotting is disabled. Configure S3_BUCKET_NAME, \
    S3_ENDPOINT_URL, AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY to enable it.";

/// Tool names and one-line descriptions, in listing order.
pub const TOOLS: [(&str, &str); 4] = [
    (
        "find_station",
        "Find radiosonde stations by name or code, or the station nearest a coordinate.",
    ),
    (
        "get_indices",
        "Surface-based CAPE, CIN and LCL pressure for an observed sounding.",
    ),
    (
        "generate_skewt",
        "Render a Skew-T log-p diagram and publish it to object storage.",
    ),
    (
        "generate_hodograph",
        "Render a hodograph of the wind profile and publish it to object storage.",
    ),
];

/// Arguments for `find_station`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindStationArgs {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Arguments for the tools that work on one observed sounding.
#[derive(Debug, Clone, Deserialize)]
pub struct SoundingArgs {
    /// Station code, case-insensitive
    pub station: String,
    /// Observation time, passed to the archive as given
    pub timestamp: String,
}

impl SoundingArgs {
    pub fn new(station: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            timestamp: timestamp.into(),
        }
    }

    fn validate(&self) -> RaobResult<()> {
        if self.station.trim().is_empty() {
            return Err(RaobError::Usage("station is required".to_string()));
        }
        if self.timestamp.trim().is_empty() {
            return Err(RaobError::Usage("timestamp is required".to_string()));
        }
        Ok(())
    }

    fn station_code(&self) -> String {
        self.station.trim().to_uppercase()
    }
}

/// Successful tool results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolPayload {
    Matches { matches: Vec<Station> },
    Closest { closest: Station },
    Indices(IndicesReport),
    Artifact { url: String },
}

/// Result of a tool call as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Ok(ToolPayload),
    NotFound { message: String },
    InsufficientData { message: String },
    PublishingUnavailable { message: String },
}

impl ToolOutcome {
    /// Fold data outcomes carried as errors into an outcome; pass faults through.
    pub fn from_result(result: RaobResult<ToolPayload>) -> RaobResult<Self> {
        match result {
            Ok(payload) => Ok(ToolOutcome::Ok(payload)),
            Err(e) if e.is_data_outcome() => {
                let message = e.to_string();
                Ok(match e {
                    RaobError::NotFound { .. } => ToolOutcome::NotFound { message },
                    RaobError::InsufficientData(_) => ToolOutcome::InsufficientData { message },
                    _ => ToolOutcome::PublishingUnavailable { message },
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Label used in metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ToolOutcome::Ok(_) => "ok",
            ToolOutcome::NotFound { .. } => "not_found",
            ToolOutcome::InsufficientData { .. } => "insufficient_data",
            ToolOutcome::PublishingUnavailable { .. } => "publishing_unavailable",
        }
    }
}

/// The sounding tools, wired to their data sources and optional publisher.
pub struct ToolService {
    stations: Arc<dyn StationSource>,
    soundings: Arc<dyn SoundingSource>,
    publisher: Option<Arc<dyn ArtifactPublisher>>,
    skewt: SkewTConfig,
    hodograph: HodographConfig,
}

impl ToolService {
    pub fn new(
        stations: Arc<dyn StationSource>,
        soundings: Arc<dyn SoundingSource>,
        publisher: Option<Arc<dyn ArtifactPublisher>>,
    ) -> Self {
        Self {
            stations,
            soundings,
            publisher,
            skewt: SkewTConfig::default(),
            hodograph: HodographConfig::default(),
        }
    }

    /// Whether plot tools can publish.
    pub fn publishing_enabled(&self) -> bool {
        self.publisher.is_some()
    }

    /// Search the directory by name/code, or find the station nearest a point.
    ///
    /// A non-blank query takes precedence over coordinates. Both `lat` and
    /// `lon` are needed for a nearest-station search.
    #[instrument(skip(self))]
    pub async fn find_station(&self, args: FindStationArgs) -> RaobResult<ToolOutcome> {
        let started = Instant::now();
        let result = self.find_station_inner(&args).await;
        record("find_station", started, result)
    }

    async fn find_station_inner(&self, args: &FindStationArgs) -> RaobResult<ToolOutcome> {
        let query = args
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());

        if let Some(query) = query {
            let directory = self.stations.directory().await?;
            let matches = directory.search(query);
            info!(query, count = matches.len(), "Station search");
            return Ok(ToolOutcome::Ok(ToolPayload::Matches { matches }));
        }

        let (Some(lat), Some(lon)) = (args.lat, args.lon) else {
            return Err(RaobError::Usage("Provide a query or coordinates.".to_string()));
        };

        let directory = self.stations.directory().await?;
        match directory.nearest(lat, lon) {
            Some(station) => {
                info!(lat, lon, station = %station.id, "Nearest station");
                Ok(ToolOutcome::Ok(ToolPayload::Closest {
                    closest: station.clone(),
                }))
            }
            None => Ok(ToolOutcome::NotFound {
                message: format!("No station near ({}, {})", lat, lon),
            }),
        }
    }

    /// Surface-based CAPE, CIN and LCL pressure, rounded to one decimal.
    #[instrument(skip(self))]
    pub async fn get_indices(&self, args: SoundingArgs) -> RaobResult<ToolOutcome> {
        let started = Instant::now();
        let result = ToolOutcome::from_result(self.get_indices_inner(&args).await);
        record("get_indices", started, result)
    }

    async fn get_indices_inner(&self, args: &SoundingArgs) -> RaobResult<ToolPayload> {
        args.validate()?;
        let profile = self.soundings.fetch(&args.station, &args.timestamp).await?;

        let thermo = sanitize_thermo(&profile);
        if thermo.is_empty() {
            return Err(RaobError::InsufficientData(
                "no level has pressure, temperature and dewpoint".to_string(),
            ));
        }

        let report = derive_indices(&thermo)?.report();
        info!(
            station = %args.station_code(),
            sbcape = report.sbcape,
            sbcin = report.sbcin,
            lcl_hpa = report.lcl_hpa,
            "Derived indices"
        );
        Ok(ToolPayload::Indices(report))
    }

    /// Render and publish a Skew-T diagram.
    #[instrument(skip(self))]
    pub async fn generate_skewt(&self, args: SoundingArgs) -> RaobResult<ToolOutcome> {
        let started = Instant::now();
        let result = ToolOutcome::from_result(self.generate_skewt_inner(&args).await);
        record("generate_skewt", started, result)
    }

    async fn generate_skewt_inner(&self, args: &SoundingArgs) -> RaobResult<ToolPayload> {
        args.validate()?;
        let publisher = self.publisher()?;
        let profile = self.soundings.fetch(&args.station, &args.timestamp).await?;

        let thermo = sanitize_thermo(&profile);
        if thermo.is_empty() {
            return Err(RaobError::InsufficientData(
                "no level has pressure, temperature and dewpoint".to_string(),
            ));
        }

        let config = self.skewt.clone();
        let png = render_blocking(move || {
            let parcel = parcel_path(&thermo)?;
            render_skewt(&config, &thermo, Some(&parcel))
        })
        .await?;

        let url = publish(publisher, "skewt", args, png).await?;
        Ok(ToolPayload::Artifact { url })
    }

    /// Render and publish a hodograph.
    #[instrument(skip(self))]
    pub async fn generate_hodograph(&self, args: SoundingArgs) -> RaobResult<ToolOutcome> {
        let started = Instant::now();
        let result = ToolOutcome::from_result(self.generate_hodograph_inner(&args).await);
        record("generate_hodograph", started, result)
    }

    async fn generate_hodograph_inner(&self, args: &SoundingArgs) -> RaobResult<ToolPayload> {
        args.validate()?;
        let publisher = self.publisher()?;
        let profile = self.soundings.fetch(&args.station, &args.timestamp).await?;

        let wind = sanitize_wind(&profile);
        if wind.is_empty() {
            return Err(RaobError::InsufficientData(
                "no level has wind direction, speed and height".to_string(),
            ));
        }

        let config = self.hodograph.clone();
        let png = render_blocking(move || {
            let components = wind_components(&wind)?;
            render_hodograph(&config, &components)
        })
        .await?;

        let url = publish(publisher, "hodograph", args, png).await?;
        Ok(ToolPayload::Artifact { url })
    }

    /// The publisher, checked before any fetch.
    fn publisher(&self) -> RaobResult<&Arc<dyn ArtifactPublisher>> {
        self.publisher
            .as_ref()
            .ok_or_else(|| RaobError::PublishingUnavailable(PUBLISHING_DISABLED.to_string()))
    }
}

/// Run CPU-bound rendering off the async worker threads.
async fn render_blocking<F>(render: F) -> RaobResult<Vec<u8>>
where
    F: FnOnce() -> RaobResult<Vec<u8>> + Send + 'static,
{
    tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| RaobError::Internal(format!("Rendering task failed: {}", e)))?
}

/// Publish a rendered plot. Any storage failure becomes a publishing outcome.
async fn publish(
    publisher: &Arc<dyn ArtifactPublisher>,
    prefix: &str,
    args: &SoundingArgs,
    png: Vec<u8>,
) -> RaobResult<String> {
    let key = ArtifactPath::plot(prefix, &args.station_code(), &args.timestamp);
    let size = png.len();

    match publisher.publish(&key, Bytes::from(png)).await {
        Ok(url) => {
            info!(key = %key, size, url = %url, "Published plot");
            Ok(url)
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Publishing failed");
            Err(RaobError::PublishingUnavailable(format!(
                "Failed to publish {}: {}",
                key, e
            )))
        }
    }
}

fn record(
    tool: &'static str,
    started: Instant,
    result: RaobResult<ToolOutcome>,
) -> RaobResult<ToolOutcome> {
    let outcome = match &result {
        Ok(outcome) => outcome.label(),
        Err(e) => e.error_code(),
    };
    counter!("raob_tool_requests_total", "tool" => tool, "outcome" => outcome).increment(1);
    histogram!("raob_tool_duration_seconds", "tool" => tool).record(started.elapsed().as_secs_f64());
    result
}
