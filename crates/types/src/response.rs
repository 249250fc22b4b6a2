//! Envelope returned from every invocation.

use serde::{Deserialize, Serialize};

use crate::parameters::AutomationParameters;

/// Result of a single invocation as seen by the orchestrator.
///
/// The orchestrator branches on the presence of `statusCode`, so failures are
/// returned as values rather than raised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HandlerResponse {
    Failure {
        #[serde(rename = "statusCode")]
        status_code: u16,
        body: String,
    },
    Success {
        #[serde(rename = "AutomationParameters")]
        automation_parameters: Box<AutomationParameters>,
    },
}

impl HandlerResponse {
    pub fn failure(status_code: u16, body: impl Into<String>) -> Self {
        Self::Failure {
            status_code,
            body: body.into(),
        }
    }

    pub fn success(automation_parameters: AutomationParameters) -> Self {
        Self::Success {
            automation_parameters: Box::new(automation_parameters),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Status code for failures; `None` on success.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Failure { status_code, .. } => Some(*status_code),
            Self::Success { .. } => None,
        }
    }

    /// Parameters for a successful run.
    pub fn parameters(&self) -> Option<&AutomationParameters> {
        match self {
            Self::Success { automation_parameters } => Some(automation_parameters.as_ref()),
            Self::Failure { .. } => None,
        }
    }

    /// Failure message, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Failure { body, .. } => Some(body.as_str()),
            Self::Success { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_serializes_as_status_and_body() {
        let response = HandlerResponse::failure(400, "BundleId was not provided");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"statusCode": 400, "body": "BundleId was not provided"})
        );
        assert_eq!(response.status_code(), Some(400));
        assert!(!response.is_success());
        assert!(response.parameters().is_none());
    }
}
