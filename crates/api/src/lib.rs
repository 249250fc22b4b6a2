//! Client seams for the external services the provisioner talks to.
//!
//! Each service is reached through a small async trait so the engine can be
//! driven by the AWS SDK in production and by in-memory fakes in tests:
//!
//! - [`DesktopService`]: directory lookup and desktop creation (WorkSpaces)
//! - [`DirectoryDataAccess`]: data access status of a directory (Directory Service)
//! - [`ParameterStore`]: secret-capable key/value lookup (SSM Parameter Store)
//! - [`ApiEndpointService`]: default endpoint toggle of the automation REST API (API Gateway)
//!
//! [`ServiceClients`] bundles one handle of each. Build the production set with
//! [`aws::load_service_clients`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use wsimage_types::{BuilderDesktopRequest, DataAccessStatus, DesktopId, RegistrationState};

pub mod aws;

/// Errors surfaced by any of the client implementations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The call failed in transport or the service returned an error.
    #[error("{operation} failed: {message}")]
    Service { operation: &'static str, message: String },

    /// The request could not be assembled locally.
    #[error("{operation} request is invalid: {message}")]
    InvalidRequest { operation: &'static str, message: String },

    /// The service answered but left out a field the caller needs.
    #[error("{operation} response did not include {field}")]
    MissingField { operation: &'static str, field: &'static str },

    /// The service accepted the call but refused the specific request.
    #[error("{operation} was rejected ({code}): {message}")]
    Rejected {
        operation: &'static str,
        code: String,
        message: String,
    },
}

impl ApiError {
    pub fn service(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            operation,
            message: message.into(),
        }
    }

    pub fn invalid_request(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            operation,
            message: message.into(),
        }
    }

    pub fn missing_field(operation: &'static str, field: &'static str) -> Self {
        Self::MissingField { operation, field }
    }

    pub fn rejected(operation: &'static str, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Name of the remote operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Service { operation, .. }
            | Self::InvalidRequest { operation, .. }
            | Self::MissingField { operation, .. }
            | Self::Rejected { operation, .. } => *operation,
        }
    }
}

/// Managed desktop service operations.
#[async_trait]
pub trait DesktopService: Send + Sync {
    /// Registration state of a directory known to the desktop service.
    ///
    /// Returns `Ok(None)` when the service knows no directory with that id.
    async fn describe_directory(&self, directory_id: &str) -> Result<Option<RegistrationState>, ApiError>;

    /// Request one desktop and return the id the service assigned to it.
    async fn create_desktop(&self, request: &BuilderDesktopRequest) -> Result<DesktopId, ApiError>;
}

/// Directory data access queries.
#[async_trait]
pub trait DirectoryDataAccess: Send + Sync {
    async fn describe_data_access(&self, directory_id: &str) -> Result<DataAccessStatus, ApiError>;
}

/// Key/value parameter lookup with decryption of secure values.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch a parameter value. A parameter that does not exist is `Ok(None)`.
    async fn get_parameter(&self, name: &str) -> Result<Option<String>, ApiError>;
}

/// Default execute endpoint management for the automation REST API.
#[async_trait]
pub trait ApiEndpointService: Send + Sync {
    /// Whether the default execute-api endpoint of `api_id` is disabled.
    async fn is_execute_endpoint_disabled(&self, api_id: &str) -> Result<bool, ApiError>;

    /// Turn the default endpoint back on and deploy the change to `stage_name`.
    async fn enable_execute_endpoint(&self, api_id: &str, stage_name: &str) -> Result<(), ApiError>;
}

/// One shared handle per external service.
///
/// Handles are cheap to clone and safe to reuse across invocations.
#[derive(Clone)]
pub struct ServiceClients {
    pub desktops: Arc<dyn DesktopService>,
    pub data_access: Arc<dyn DirectoryDataAccess>,
    pub parameters: Arc<dyn ParameterStore>,
    pub endpoints: Arc<dyn ApiEndpointService>,
}
