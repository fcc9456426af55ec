//! Analysis request surface
//!
//! Transport-independent handlers for the two operations the service
//! exposes: "analyze a URL" and "health". An HTTP router (or the CLI) only
//! has to move bytes in and out of these types.

mod service;
mod types;

pub use service::AnalysisService;
pub use types::{
    AnalysisRequest, ApiBody, ApiError, ApiResponse, ErrorResponse, HealthResponse,
};
