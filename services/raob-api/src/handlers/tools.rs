//! Tool invocation handlers.
//!
//! Normal outcomes (including "not found", "insufficient data" and
//! "publishing unavailable") are 200 responses tagged by `status`. Faults are
//! `{"error": <code>, "message": ...}` with the error's HTTP status.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use raob_common::RaobError;

use crate::state::AppState;
use crate::tools::{FindStationArgs, SoundingArgs, ToolOutcome, TOOLS};

/// A `RaobError` rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub RaobError);

impl From<RaobError> for ApiError {
    fn from(e: RaobError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(RaobError::Usage(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Tool call failed");
        }

        let body = json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

type ToolResponse = Result<Json<ToolOutcome>, ApiError>;

#[derive(Serialize)]
pub struct ToolDescription {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct ToolListing {
    pub tools: Vec<ToolDescription>,
}

/// GET /tools
pub async fn list_tools_handler() -> Json<ToolListing> {
    Json(ToolListing {
        tools: TOOLS
            .iter()
            .map(|&(name, description)| ToolDescription { name, description })
            .collect(),
    })
}

/// POST /tools/find_station
pub async fn find_station_handler(
    Extension(state): Extension<Arc<AppState>>,
    args: Result<Json<FindStationArgs>, JsonRejection>,
) -> ToolResponse {
    let Json(args) = args?;
    Ok(Json(state.tools.find_station(args).await?))
}

/// POST /tools/get_indices
pub async fn get_indices_handler(
    Extension(state): Extension<Arc<AppState>>,
    args: Result<Json<SoundingArgs>, JsonRejection>,
) -> ToolResponse {
    let Json(args) = args?;
    Ok(Json(state.tools.get_indices(args).await?))
}

/// POST /tools/generate_skewt
pub async fn generate_skewt_handler(
    Extension(state): Extension<Arc<AppState>>,
    args: Result<Json<SoundingArgs>, JsonRejection>,
) -> ToolResponse {
    let Json(args) = args?;
    Ok(Json(state.tools.generate_skewt(args).await?))
}

/// POST /tools/generate_hodograph
pub async fn generate_hodograph_handler(
    Extension(state): Extension<Arc<AppState>>,
    args: Result<Json<SoundingArgs>, JsonRejection>,
) -> ToolResponse {
    let Json(args) = args?;
    Ok(Json(state.tools.generate_hodograph(args).await?))
}
