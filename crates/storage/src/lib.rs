//! Storage abstractions for the RAOB tool service.
//!
//! Provides a unified interface for publishing rendered plots to object
//! storage (S3 compatible) and returning a retrievable locator.

pub mod object_store;

pub use self::object_store::{ArtifactPath, ArtifactPublisher, ObjectStorage, ObjectStorageConfig};
