//! Invocation boundary.
//!
//! Nothing past this point returns `Err`: every failure becomes a
//! [`HandlerResponse::Failure`] the orchestrator can branch on.

use serde_json::Value;
use tracing::{error, info};
use wsimage_types::{HandlerResponse, ProvisionRequest};

use crate::{BuilderProvisioner, ProvisionError};

/// Decode a raw event and run one provisioning pass.
///
/// A `null` event is treated as an empty request so every value falls back
/// to its default.
pub async fn handle_event(provisioner: &BuilderProvisioner, event: Value) -> HandlerResponse {
    let request = if event.is_null() {
        ProvisionRequest::default()
    } else {
        match serde_json::from_value::<ProvisionRequest>(event) {
            Ok(request) => request,
            Err(error) => {
                let error = ProvisionError::from(error);
                error!(kind = error.kind(), %error, "rejecting event");
                return error.into_response();
            }
        }
    };
    handle_request(provisioner, &request).await
}

/// Run one provisioning pass for an already decoded request.
pub async fn handle_request(provisioner: &BuilderProvisioner, request: &ProvisionRequest) -> HandlerResponse {
    match provisioner.provision(request).await {
        Ok(outcome) => {
            info!(
                workspace_id = %outcome.parameters.image_builder_work_space_id,
                desktop_created = outcome.desktop.is_ok(),
                "provisioning complete"
            );
            HandlerResponse::success(outcome.parameters)
        }
        Err(error) => {
            error!(kind = error.kind(), %error, "provisioning failed");
            error.into_response()
        }
    }
}
