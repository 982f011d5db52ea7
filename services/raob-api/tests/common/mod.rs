//! In-memory stand-ins for the upstream services and the publisher.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use raob_api::tools::ToolService;
use raob_api::upstream::{SoundingSource, StationSource};
use raob_common::{Profile, RaobError, RaobResult, StationDirectory};
use storage::ArtifactPublisher;

pub struct FakeStations {
    pub directory: StationDirectory,
}

#[async_trait]
impl StationSource for FakeStations {
    async fn directory(&self) -> RaobResult<StationDirectory> {
        Ok(self.directory.clone())
    }
}

pub struct UnreachableStations;

#[async_trait]
impl StationSource for UnreachableStations {
    async fn directory(&self) -> RaobResult<StationDirectory> {
        Err(RaobError::UpstreamUnavailable("connection refused".to_string()))
    }
}

/// Serves one profile for every request, or `NotFound` when `profile` is `None`.
pub struct FakeSoundings {
    pub profile: Option<Profile>,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<(String, String)>>,
}

impl FakeSoundings {
    pub fn new(profile: Option<Profile>) -> Self {
        Self {
            profile,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SoundingSource for FakeSoundings {
    async fn fetch(&self, station: &str, timestamp: &str) -> RaobResult<Profile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap()
            .push((station.to_string(), timestamp.to_string()));
        self.profile.clone().ok_or_else(|| RaobError::NotFound {
            station: station.to_uppercase(),
            timestamp: timestamp.to_string(),
        })
    }
}

pub struct FailingSoundings {
    pub status: u16,
}

#[async_trait]
impl SoundingSource for FailingSoundings {
    async fn fetch(&self, _station: &str, _timestamp: &str) -> RaobResult<Profile> {
        Err(RaobError::Upstream {
            status: self.status,
            message: "archive error".to_string(),
        })
    }
}

/// Keeps every published object in memory.
#[derive(Default)]
pub struct RecordingPublisher {
    pub objects: Mutex<Vec<(String, Bytes)>>,
}

impl RecordingPublisher {
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ArtifactPublisher for RecordingPublisher {
    async fn publish(&self, key: &str, data: Bytes) -> RaobResult<String> {
        self.objects.lock().unwrap().push((key.to_string(), data));
        Ok(format!("http://minio:9000/plots/{}", key))
    }
}

pub struct FailingPublisher;

#[async_trait]
impl ArtifactPublisher for FailingPublisher {
    async fn publish(&self, _key: &str, _data: Bytes) -> RaobResult<String> {
        Err(RaobError::Storage("bucket does not exist".to_string()))
    }
}

pub fn service(
    stations: impl StationSource + 'static,
    soundings: Arc<FakeSoundings>,
    publisher: Option<Arc<dyn ArtifactPublisher>>,
) -> ToolService {
    ToolService::new(Arc::new(stations), soundings, publisher)
}
