//! Request and response types for the analysis surface

use crate::output::AnalysisResult;
use crate::{AnalyzerError, UrlError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of an "analyze a URL" request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub url: String,
}

impl AnalysisRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Error payload returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
}

/// Health check payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Response body: either a result or an error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApiBody {
    Analysis(AnalysisResult),
    Error(ErrorResponse),
}

/// A status code and the body to send with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ApiBody,
}

impl ApiResponse {
    /// A `200 OK` carrying an analysis result
    pub fn ok(result: AnalysisResult) -> Self {
        Self {
            status: 200,
            body: ApiBody::Analysis(result),
        }
    }

    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The analysis result, if this is a success response
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.body {
            ApiBody::Analysis(result) => Some(result),
            ApiBody::Error(_) => None,
        }
    }

    /// Serializes the body as JSON
    pub fn body_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }
}

impl From<ApiError> for ApiResponse {
    fn from(error: ApiError) -> Self {
        Self {
            status: error.status_code(),
            body: ApiBody::Error(error.to_response()),
        }
    }
}

/// Failures surfaced to callers of the analysis surface
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be decoded
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// The caller sent a missing or malformed URL
    #[error("{0}")]
    BadRequest(#[from] UrlError),

    /// The page could not be fetched or analyzed
    #[error("Failed to analyze URL: {0}")]
    BadGateway(#[from] AnalyzerError),
}

impl ApiError {
    /// HTTP status that represents this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidBody(_) | ApiError::BadRequest(_) => 400,
            ApiError::BadGateway(_) => 502,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status_code: self.status_code(),
            message: self.to_string(),
        }
    }
}
