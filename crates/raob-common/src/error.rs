//! Error types for the RAOB sounding services.

use thiserror::Error;

/// Result type alias using RaobError.
pub type RaobResult<T> = Result<T, RaobError>;

/// Primary error type for sounding operations.
#[derive(Debug, Error)]
pub enum RaobError {
    // === Caller Errors ===
    #[error("Usage error: {0}")]
    Usage(String),

    // === Data Outcomes ===
    #[error("No observation found for station {station} at {timestamp}")]
    NotFound { station: String, timestamp: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    // === Upstream Errors ===
    #[error("Upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    // === Publishing Errors ===
    #[error("Publishing unavailable: {0}")]
    PublishingUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // === Computation Errors ===
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RaobError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            RaobError::Usage(_) => "usage_error",
            RaobError::NotFound { .. } => "not_found",
            RaobError::InsufficientData(_) => "insufficient_data",
            RaobError::Upstream { .. } => "upstream_error",
            RaobError::UpstreamUnavailable(_) => "upstream_unavailable",
            RaobError::PublishingUnavailable(_) => "publishing_unavailable",
            RaobError::Storage(_) => "storage_error",
            RaobError::InvalidProfile(_) => "invalid_profile",
            RaobError::Render(_) => "render_error",
            RaobError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            RaobError::Usage(_) => 400,
            RaobError::NotFound { .. } => 404,
            RaobError::InsufficientData(_) => 422,
            RaobError::Upstream { .. } => 502,
            RaobError::UpstreamUnavailable(_) | RaobError::PublishingUnavailable(_) => 503,
            _ => 500,
        }
    }

    /// Whether this is a data-quality outcome rather than a system failure.
    ///
    /// Callers report these to users as normal results.
    pub fn is_data_outcome(&self) -> bool {
        matches!(
            self,
            RaobError::NotFound { .. }
                | RaobError::InsufficientData(_)
                | RaobError::PublishingUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(RaobError::Usage("x".to_string()).http_status_code(), 400);
        assert_eq!(
            RaobError::Upstream {
                status: 500,
                message: "boom".to_string()
            }
            .http_status_code(),
            502
        );
        assert_eq!(
            RaobError::UpstreamUnavailable("timeout".to_string()).http_status_code(),
            503
        );
        assert_eq!(
            RaobError::InvalidProfile("nan".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_data_outcomes_are_distinguishable() {
        let not_found = RaobError::NotFound {
            station: "OAX".to_string(),
            timestamp: "202405211200".to_string(),
        };
        let upstream = RaobError::Upstream {
            status: 500,
            message: "Internal Server Error".to_string(),
        };

        assert!(not_found.is_data_outcome());
        assert!(!upstream.is_data_outcome());
        assert_ne!(not_found.error_code(), upstream.error_code());
    }

    #[test]
    fn test_error_display() {
        let err = RaobError::NotFound {
            station: "DNR".to_string(),
            timestamp: "2024-05-21T12:00Z".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("DNR"));
        assert!(display.contains("2024-05-21T12:00Z"));
    }
}
