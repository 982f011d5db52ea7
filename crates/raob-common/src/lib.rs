//! Common types and utilities shared across the RAOB sounding services.

pub mod error;
pub mod level;
pub mod station;

pub use error::{RaobError, RaobResult};
pub use level::{Level, Profile};
pub use station::{Station, StationDirectory, MAX_SEARCH_MATCHES};
