//! Upstream service configuration.

use std::time::Duration;

/// Default station directory listing.
pub const DEFAULT_STATION_URL: &str = "https://mesonet.agron.iastate.edu/api/1/network/RAOB.json";

/// Default sounding archive endpoint.
pub const DEFAULT_SOUNDING_URL: &str = "https://mesonet.agron.iastate.edu/json/raob.py";

pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Port used when neither `--listen` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 8000;

/// Where station and sounding data are fetched from.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Station directory URL, returning `{"data": [...]}`
    pub station_url: String,
    /// Sounding archive URL, queried with `station` and `ts`
    pub sounding_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            station_url: DEFAULT_STATION_URL.to_string(),
            sounding_url: DEFAULT_SOUNDING_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

/// Listen address for a `PORT` value, falling back to [`DEFAULT_PORT`] when
/// it is absent or not a valid port number.
pub fn default_listen_addr(port: Option<&str>) -> String {
    let port = port
        .and_then(|p| p.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    format!("0.0.0.0:{}", port)
}
