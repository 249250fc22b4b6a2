//! Failures that stop a provisioning run.

use thiserror::Error;
use wsimage_api::ApiError;
use wsimage_types::{DataAccessStatus, HandlerResponse, RegistrationState};

/// Status code returned to the orchestrator for every failed run.
pub const FAILURE_STATUS_CODE: u16 = 400;

/// Reasons a run is aborted before parameters can be returned.
///
/// Desktop creation failures are deliberately absent: they degrade to the
/// `FAILED` desktop id instead of aborting.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{name} is required but was not found in {searched}")]
    MissingConfiguration { name: &'static str, searched: &'static str },

    #[error("Directory {directory_id} was not found in WorkSpaces")]
    DirectoryNotFound { directory_id: String },

    #[error("Directory {directory_id} is in state {state}; it must be REGISTERED with WorkSpaces")]
    DirectoryNotRegistered { directory_id: String, state: RegistrationState },

    #[error("Data access for directory {directory_id} is {status}; it must be Enabled")]
    DataAccessDisabled { directory_id: String, status: DataAccessStatus },

    #[error("{name} must be a whole number, got '{value}'")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Invalid event payload: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("External service error: {0}")]
    ExternalService(#[from] ApiError),
}

impl ProvisionError {
    pub fn missing_directory_id() -> Self {
        Self::MissingConfiguration {
            name: "DirectoryId",
            searched: "the event, the DirectoryId environment variable, or parameter store",
        }
    }

    pub fn missing_bundle_id() -> Self {
        Self::MissingConfiguration {
            name: "BundleId",
            searched: "the event or the BundleId environment variable",
        }
    }

    /// Short, stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingConfiguration { .. } => "MissingConfiguration",
            Self::DirectoryNotFound { .. } => "DirectoryNotFound",
            Self::DirectoryNotRegistered { .. } => "DirectoryNotRegistered",
            Self::DataAccessDisabled { .. } => "DataAccessDisabled",
            Self::InvalidParameter { .. } => "InvalidParameter",
            Self::InvalidEvent(_) => "InvalidEvent",
            Self::ExternalService(_) => "ExternalServiceError",
        }
    }

    pub fn status_code(&self) -> u16 {
        FAILURE_STATUS_CODE
    }

    pub fn into_response(self) -> HandlerResponse {
        HandlerResponse::failure(self.status_code(), self.to_string())
    }
}
