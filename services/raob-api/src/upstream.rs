//! Upstream data sources: the station directory and the sounding archive.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use raob_common::{Level, Profile, RaobError, RaobResult, Station, StationDirectory};

use crate::config::UpstreamConfig;

/// Source of the radiosonde station directory.
#[async_trait]
pub trait StationSource: Send + Sync {
    /// Fetch the full directory. Single attempt, no caching.
    async fn directory(&self) -> RaobResult<StationDirectory>;
}

/// Source of observed soundings.
#[async_trait]
pub trait SoundingSource: Send + Sync {
    /// Fetch the profile observed at `station` for `timestamp`.
    ///
    /// Returns `RaobError::NotFound` when the archive holds no observation.
    async fn fetch(&self, station: &str, timestamp: &str) -> RaobResult<Profile>;
}

/// Station directory listing: `{"data": [...]}`.
#[derive(Debug, Deserialize)]
struct StationListing {
    data: Vec<StationRecord>,
}

#[derive(Debug, Deserialize)]
struct StationRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, alias = "latitude")]
    lat: Option<f64>,
    #[serde(default, alias = "longitude")]
    lon: Option<f64>,
}

impl StationRecord {
    fn into_station(self) -> Option<Station> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Station::new(self.id, self.name, lat, lon))
            }
            _ => {
                debug!(id = %self.id, "Skipping station without coordinates");
                None
            }
        }
    }
}

/// Sounding archive response: `{"profiles": [{"data": [...]}, ...]}`.
#[derive(Debug, Deserialize)]
struct SoundingResponse {
    #[serde(default)]
    profiles: Option<Vec<SoundingProfile>>,
}

#[derive(Debug, Deserialize)]
struct SoundingProfile {
    #[serde(default, alias = "profile")]
    data: Vec<Level>,
}

/// HTTP client for the Iowa Environmental Mesonet station and sounding services.
pub struct MesonetClient {
    client: Client,
    config: UpstreamConfig,
}

impl MesonetClient {
    pub fn new(config: UpstreamConfig) -> RaobResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RaobError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl StationSource for MesonetClient {
    #[instrument(skip(self), fields(url = %self.config.station_url))]
    async fn directory(&self) -> RaobResult<StationDirectory> {
        let unavailable =
            |e: reqwest::Error| RaobError::UpstreamUnavailable(format!("Station directory: {}", e));

        let response = self
            .client
            .get(&self.config.station_url)
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Station directory request failed");
            return Err(RaobError::UpstreamUnavailable(format!(
                "Station directory returned HTTP {}",
                response.status()
            )));
        }

        let listing: StationListing = response.json().await.map_err(unavailable)?;
        let total = listing.data.len();
        let stations: Vec<Station> = listing
            .data
            .into_iter()
            .filter_map(StationRecord::into_station)
            .collect();

        info!(count = stations.len(), skipped = total - stations.len(), "Fetched station directory");
        Ok(StationDirectory::new(stations))
    }
}

#[async_trait]
impl SoundingSource for MesonetClient {
    #[instrument(skip(self), fields(url = %self.config.sounding_url))]
    async fn fetch(&self, station: &str, timestamp: &str) -> RaobResult<Profile> {
        let code = station.trim().to_uppercase();
        let unavailable =
            |e: reqwest::Error| RaobError::UpstreamUnavailable(format!("Sounding archive: {}", e));

        let response = self
            .client
            .get(&self.config.sounding_url)
            .query(&[("station", code.as_str()), ("ts", timestamp)])
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, station = %code, "Sounding request failed");
            return Err(RaobError::Upstream {
                status: status.as_u16(),
                message: format!("Sounding archive request for {} at {} failed", code, timestamp),
            });
        }

        let body: SoundingResponse = response.json().await.map_err(unavailable)?;
        let levels = body
            .profiles
            .and_then(|profiles| profiles.into_iter().next())
            .map(|profile| profile.data)
            .unwrap_or_default();

        if levels.is_empty() {
            info!(station = %code, timestamp, "No sounding found");
            return Err(RaobError::NotFound {
                station: code,
                timestamp: timestamp.to_string(),
            });
        }

        debug!(station = %code, levels = levels.len(), "Fetched sounding");
        Ok(levels)
    }
}
