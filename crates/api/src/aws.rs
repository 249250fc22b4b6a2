//! AWS SDK implementations of the client traits.
//!
//! Clients are built once from the ambient AWS configuration (region and
//! credentials from the Lambda environment) and shared across invocations.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_apigateway::types::{Op, PatchOperation};
use aws_sdk_workspaces::error::DisplayErrorContext;
use aws_sdk_workspaces::types::{Compute, RunningMode as SdkRunningMode, Tag, WorkspaceProperties, WorkspaceRequest};
use tracing::{debug, info};
use wsimage_types::{BuilderDesktopRequest, DataAccessStatus, DesktopId, RegistrationState};

use crate::{ApiEndpointService, ApiError, DesktopService, DirectoryDataAccess, ParameterStore, ServiceClients};

/// Load the default AWS configuration and build one client per service.
pub async fn load_service_clients() -> ServiceClients {
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    service_clients_from_config(&sdk_config)
}

/// Build the production client set from an existing SDK configuration.
pub fn service_clients_from_config(sdk_config: &SdkConfig) -> ServiceClients {
    ServiceClients {
        desktops: Arc::new(WorkSpacesDesktopService::new(aws_sdk_workspaces::Client::new(sdk_config))),
        data_access: Arc::new(DirectoryServiceDataAccess::new(aws_sdk_directory::Client::new(sdk_config))),
        parameters: Arc::new(SsmParameterStore::new(aws_sdk_ssm::Client::new(sdk_config))),
        endpoints: Arc::new(ApiGatewayEndpoints::new(aws_sdk_apigateway::Client::new(sdk_config))),
    }
}

fn service_error<E: StdError>(operation: &'static str, error: E) -> ApiError {
    ApiError::service(operation, DisplayErrorContext(error).to_string())
}

// The SDK models sizes and timeouts as `i32`.
fn to_sdk_size(operation: &'static str, field: &str, value: u32) -> Result<i32, ApiError> {
    i32::try_from(value).map_err(|_| ApiError::invalid_request(operation, format!("{field} of {value} exceeds {}", i32::MAX)))
}

/// [`DesktopService`] backed by Amazon WorkSpaces.
#[derive(Debug, Clone)]
pub struct WorkSpacesDesktopService {
    client: aws_sdk_workspaces::Client,
}

impl WorkSpacesDesktopService {
    pub fn new(client: aws_sdk_workspaces::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DesktopService for WorkSpacesDesktopService {
    async fn describe_directory(&self, directory_id: &str) -> Result<Option<RegistrationState>, ApiError> {
        const OPERATION: &str = "DescribeWorkspaceDirectories";
        let output = self
            .client
            .describe_workspace_directories()
            .directory_ids(directory_id)
            .send()
            .await
            .map_err(|error| service_error(OPERATION, error))?;

        let state = output
            .directories()
            .iter()
            .find(|directory| directory.directory_id() == Some(directory_id))
            .map(|directory| {
                directory
                    .state()
                    .map(|state| RegistrationState::from(state.as_str()))
                    .unwrap_or_else(|| RegistrationState::Unknown("UNKNOWN".into()))
            });
        debug!(%directory_id, found = state.is_some(), "described workspace directory");
        Ok(state)
    }

    async fn create_desktop(&self, request: &BuilderDesktopRequest) -> Result<DesktopId, ApiError> {
        const OPERATION: &str = "CreateWorkspaces";
        let properties = WorkspaceProperties::builder()
            .running_mode(SdkRunningMode::from(request.running_mode.as_str()))
            .running_mode_auto_stop_timeout_in_minutes(to_sdk_size(
                OPERATION,
                "RunningModeAutoStopTimeoutInMinutes",
                request.auto_stop_timeout_minutes,
            )?)
            .root_volume_size_gib(to_sdk_size(OPERATION, "RootVolumeSizeGib", request.root_volume_size_gib)?)
            .user_volume_size_gib(to_sdk_size(OPERATION, "UserVolumeSizeGib", request.user_volume_size_gib)?)
            .compute_type_name(Compute::from(request.compute_type.as_str()))
            .build();

        let mut workspace = WorkspaceRequest::builder()
            .directory_id(&request.directory_id)
            .user_name(&request.user_name)
            .bundle_id(&request.bundle_id)
            .root_volume_encryption_enabled(request.root_volume_encryption_enabled)
            .user_volume_encryption_enabled(request.user_volume_encryption_enabled)
            .workspace_properties(properties);
        for tag in &request.tags {
            let tag = Tag::builder()
                .key(&tag.key)
                .value(&tag.value)
                .build()
                .map_err(|error| ApiError::invalid_request(OPERATION, error.to_string()))?;
            workspace = workspace.tags(tag);
        }
        let workspace = workspace
            .build()
            .map_err(|error| ApiError::invalid_request(OPERATION, error.to_string()))?;

        let output = self
            .client
            .create_workspaces()
            .workspaces(workspace)
            .send()
            .await
            .map_err(|error| service_error(OPERATION, error))?;

        if let Some(workspace_id) = output.pending_requests().iter().find_map(|pending| pending.workspace_id()) {
            return Ok(DesktopId::new(workspace_id));
        }
        if let Some(failed) = output.failed_requests().first() {
            return Err(ApiError::rejected(
                OPERATION,
                failed.error_code().unwrap_or("Unknown"),
                failed.error_message().unwrap_or("no error message returned"),
            ));
        }
        Err(ApiError::missing_field(OPERATION, "PendingRequests[0].WorkspaceId"))
    }
}

/// [`DirectoryDataAccess`] backed by AWS Directory Service.
#[derive(Debug, Clone)]
pub struct DirectoryServiceDataAccess {
    client: aws_sdk_directory::Client,
}

impl DirectoryServiceDataAccess {
    pub fn new(client: aws_sdk_directory::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectoryDataAccess for DirectoryServiceDataAccess {
    async fn describe_data_access(&self, directory_id: &str) -> Result<DataAccessStatus, ApiError> {
        const OPERATION: &str = "DescribeDirectoryDataAccess";
        let output = self
            .client
            .describe_directory_data_access()
            .directory_id(directory_id)
            .send()
            .await
            .map_err(|error| service_error(OPERATION, error))?;

        output
            .data_access_status()
            .map(|status| DataAccessStatus::from(status.as_str()))
            .ok_or_else(|| ApiError::missing_field(OPERATION, "DataAccessStatus"))
    }
}

/// [`ParameterStore`] backed by SSM Parameter Store.
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: aws_sdk_ssm::Client,
}

impl SsmParameterStore {
    pub fn new(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<Option<String>, ApiError> {
        const OPERATION: &str = "GetParameter";
        match self.client.get_parameter().name(name).with_decryption(true).send().await {
            Ok(output) => Ok(output.parameter().and_then(|parameter| parameter.value()).map(str::to_string)),
            Err(error) if error.as_service_error().is_some_and(|service| service.is_parameter_not_found()) => {
                debug!(parameter = %name, "parameter does not exist");
                Ok(None)
            }
            Err(error) => Err(service_error(OPERATION, error)),
        }
    }
}

/// [`ApiEndpointService`] backed by API Gateway (REST APIs).
#[derive(Debug, Clone)]
pub struct ApiGatewayEndpoints {
    client: aws_sdk_apigateway::Client,
}

impl ApiGatewayEndpoints {
    pub fn new(client: aws_sdk_apigateway::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApiEndpointService for ApiGatewayEndpoints {
    async fn is_execute_endpoint_disabled(&self, api_id: &str) -> Result<bool, ApiError> {
        let output = self
            .client
            .get_rest_api()
            .rest_api_id(api_id)
            .send()
            .await
            .map_err(|error| service_error("GetRestApi", error))?;
        Ok(output.disable_execute_api_endpoint())
    }

    async fn enable_execute_endpoint(&self, api_id: &str, stage_name: &str) -> Result<(), ApiError> {
        let patch = PatchOperation::builder()
            .op(Op::Replace)
            .path("/disableExecuteApiEndpoint")
            .value("False")
            .build();
        self.client
            .update_rest_api()
            .rest_api_id(api_id)
            .patch_operations(patch)
            .send()
            .await
            .map_err(|error| service_error("UpdateRestApi", error))?;
        info!(%api_id, "default endpoint enabled, deploying API update");

        self.client
            .create_deployment()
            .rest_api_id(api_id)
            .stage_name(stage_name)
            .send()
            .await
            .map_err(|error| service_error("CreateDeployment", error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_apigateway::operation::create_deployment::CreateDeploymentOutput;
    use aws_sdk_apigateway::operation::get_rest_api::GetRestApiOutput;
    use aws_sdk_apigateway::operation::update_rest_api::UpdateRestApiOutput;
    use aws_sdk_directory::operation::describe_directory_data_access::DescribeDirectoryDataAccessOutput;
    use aws_sdk_directory::types::DataAccessStatus as SdkDataAccessStatus;
    use aws_sdk_ssm::operation::get_parameter::{GetParameterError, GetParameterOutput};
    use aws_sdk_ssm::types::Parameter;
    use aws_sdk_ssm::types::error::{InternalServerError, ParameterNotFound};
    use aws_sdk_workspaces::operation::create_workspaces::CreateWorkspacesOutput;
    use aws_sdk_workspaces::operation::describe_workspace_directories::DescribeWorkspaceDirectoriesOutput;
    use aws_sdk_workspaces::types::{FailedCreateWorkspaceRequest, Workspace, WorkspaceDirectory, WorkspaceDirectoryState};
    use aws_smithy_mocks::{RuleMode, mock, mock_client};

    use super::*;

    fn builder_request() -> BuilderDesktopRequest {
        BuilderDesktopRequest::new("d-1234", "wsimagebuilder", "wsb-5678", 80, 50, "POWER")
    }

    #[tokio::test]
    async fn pending_request_yields_the_new_desktop_id() {
        let rule = mock!(aws_sdk_workspaces::Client::create_workspaces)
            .match_requests(|req| {
                req.workspaces().first().is_some_and(|workspace| {
                    workspace.bundle_id() == "wsb-5678"
                        && workspace.root_volume_encryption_enabled() == Some(false)
                        && workspace.tags().iter().any(|tag| tag.key() == "Automated" && tag.value() == Some("True"))
                })
            })
            .then_output(|| {
                CreateWorkspacesOutput::builder()
                    .pending_requests(Workspace::builder().workspace_id("ws-abcde").build())
                    .build()
            });
        let service = WorkSpacesDesktopService::new(mock_client!(aws_sdk_workspaces, [&rule]));

        let desktop = service.create_desktop(&builder_request()).await.unwrap();

        assert_eq!(desktop, DesktopId::new("ws-abcde"));
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn failed_requests_alone_are_a_rejection() {
        let rule = mock!(aws_sdk_workspaces::Client::create_workspaces).then_output(|| {
            CreateWorkspacesOutput::builder()
                .failed_requests(
                    FailedCreateWorkspaceRequest::builder()
                        .error_code("ResourceLimitExceeded.WorkSpaces")
                        .error_message("You have reached the WorkSpaces limit")
                        .build(),
                )
                .build()
        });
        let service = WorkSpacesDesktopService::new(mock_client!(aws_sdk_workspaces, [&rule]));

        let err = service.create_desktop(&builder_request()).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::rejected("CreateWorkspaces", "ResourceLimitExceeded.WorkSpaces", "You have reached the WorkSpaces limit")
        );
    }

    #[tokio::test]
    async fn empty_create_response_is_a_missing_field() {
        let rule = mock!(aws_sdk_workspaces::Client::create_workspaces).then_output(|| CreateWorkspacesOutput::builder().build());
        let service = WorkSpacesDesktopService::new(mock_client!(aws_sdk_workspaces, [&rule]));

        let err = service.create_desktop(&builder_request()).await.unwrap_err();

        assert!(matches!(err, ApiError::MissingField { operation: "CreateWorkspaces", .. }));
    }

    #[tokio::test]
    async fn oversized_volume_is_rejected_before_the_request_is_sent() {
        let rule = mock!(aws_sdk_workspaces::Client::create_workspaces).then_output(|| CreateWorkspacesOutput::builder().build());
        let service = WorkSpacesDesktopService::new(mock_client!(aws_sdk_workspaces, [&rule]));
        let request = BuilderDesktopRequest::new("d-1234", "wsimagebuilder", "wsb-5678", u32::MAX, 50, "POWER");

        let err = service.create_desktop(&request).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest { operation: "CreateWorkspaces", .. }));
        assert!(err.to_string().contains("RootVolumeSizeGib"));
        assert_eq!(rule.num_calls(), 0);
    }

    #[test]
    fn sizes_beyond_the_sdk_range_are_invalid() {
        assert_eq!(to_sdk_size("CreateWorkspaces", "UserVolumeSizeGib", 50), Ok(50));
        assert_eq!(to_sdk_size("CreateWorkspaces", "UserVolumeSizeGib", i32::MAX as u32), Ok(i32::MAX));
        assert!(to_sdk_size("CreateWorkspaces", "UserVolumeSizeGib", i32::MAX as u32 + 1).is_err());
    }

    #[tokio::test]
    async fn directory_state_maps_and_missing_state_is_unknown() {
        let registered = mock!(aws_sdk_workspaces::Client::describe_workspace_directories)
            .match_requests(|req| req.directory_ids().iter().any(|id| id == "d-1234"))
            .then_output(|| {
                DescribeWorkspaceDirectoriesOutput::builder()
                    .directories(
                        WorkspaceDirectory::builder()
                            .directory_id("d-1234")
                            .state(WorkspaceDirectoryState::Registered)
                            .build(),
                    )
                    .build()
            });
        let service = WorkSpacesDesktopService::new(mock_client!(aws_sdk_workspaces, [&registered]));
        assert_eq!(service.describe_directory("d-1234").await.unwrap(), Some(RegistrationState::Registered));

        let stateless = mock!(aws_sdk_workspaces::Client::describe_workspace_directories).then_output(|| {
            DescribeWorkspaceDirectoriesOutput::builder()
                .directories(WorkspaceDirectory::builder().directory_id("d-1234").build())
                .build()
        });
        let service = WorkSpacesDesktopService::new(mock_client!(aws_sdk_workspaces, [&stateless]));
        assert_eq!(
            service.describe_directory("d-1234").await.unwrap(),
            Some(RegistrationState::Unknown("UNKNOWN".into()))
        );
    }

    #[tokio::test]
    async fn directory_absent_from_response_is_none() {
        let rule = mock!(aws_sdk_workspaces::Client::describe_workspace_directories).then_output(|| {
            DescribeWorkspaceDirectoriesOutput::builder()
                .directories(WorkspaceDirectory::builder().directory_id("d-other").build())
                .build()
        });
        let service = WorkSpacesDesktopService::new(mock_client!(aws_sdk_workspaces, [&rule]));

        assert_eq!(service.describe_directory("d-1234").await.unwrap(), None);
    }

    #[tokio::test]
    async fn data_access_status_is_read_from_directory_service() {
        let rule = mock!(aws_sdk_directory::Client::describe_directory_data_access)
            .match_requests(|req| req.directory_id() == Some("d-1234"))
            .then_output(|| {
                DescribeDirectoryDataAccessOutput::builder()
                    .data_access_status(SdkDataAccessStatus::Enabled)
                    .build()
            });
        let service = DirectoryServiceDataAccess::new(mock_client!(aws_sdk_directory, [&rule]));

        assert_eq!(service.describe_data_access("d-1234").await.unwrap(), DataAccessStatus::Enabled);

        let empty = mock!(aws_sdk_directory::Client::describe_directory_data_access)
            .then_output(|| DescribeDirectoryDataAccessOutput::builder().build());
        let service = DirectoryServiceDataAccess::new(mock_client!(aws_sdk_directory, [&empty]));
        let err = service.describe_data_access("d-1234").await.unwrap_err();
        assert!(matches!(err, ApiError::MissingField { field: "DataAccessStatus", .. }));
    }

    #[tokio::test]
    async fn parameter_value_is_read_with_decryption() {
        let rule = mock!(aws_sdk_ssm::Client::get_parameter)
            .match_requests(|req| req.name() == Some("/wsimage/directory") && req.with_decryption() == Some(true))
            .then_output(|| {
                GetParameterOutput::builder()
                    .parameter(Parameter::builder().name("/wsimage/directory").value("d-from-ssm").build())
                    .build()
            });
        let store = SsmParameterStore::new(mock_client!(aws_sdk_ssm, [&rule]));

        assert_eq!(store.get_parameter("/wsimage/directory").await.unwrap().as_deref(), Some("d-from-ssm"));
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn missing_parameter_is_none_not_an_error() {
        let rule = mock!(aws_sdk_ssm::Client::get_parameter)
            .then_error(|| GetParameterError::ParameterNotFound(ParameterNotFound::builder().build()));
        let store = SsmParameterStore::new(mock_client!(aws_sdk_ssm, [&rule]));

        assert_eq!(store.get_parameter("/wsimage/directory").await.unwrap(), None);
    }

    #[tokio::test]
    async fn other_parameter_store_errors_propagate() {
        let rule = mock!(aws_sdk_ssm::Client::get_parameter)
            .then_error(|| GetParameterError::InternalServerError(InternalServerError::builder().build()));
        let store = SsmParameterStore::new(mock_client!(aws_sdk_ssm, [&rule]));

        let err = store.get_parameter("/wsimage/directory").await.unwrap_err();
        assert_eq!(err.operation(), "GetParameter");
    }

    #[tokio::test]
    async fn disabled_endpoint_is_patched_then_deployed_to_the_stage() {
        let get = mock!(aws_sdk_apigateway::Client::get_rest_api)
            .then_output(|| GetRestApiOutput::builder().disable_execute_api_endpoint(true).build());
        let update = mock!(aws_sdk_apigateway::Client::update_rest_api)
            .match_requests(|req| {
                req.rest_api_id() == Some("abc123")
                    && req.patch_operations().iter().any(|patch| {
                        patch.op() == Some(&Op::Replace)
                            && patch.path() == Some("/disableExecuteApiEndpoint")
                            && patch.value() == Some("False")
                    })
            })
            .then_output(|| UpdateRestApiOutput::builder().build());
        let deploy = mock!(aws_sdk_apigateway::Client::create_deployment)
            .match_requests(|req| req.rest_api_id() == Some("abc123") && req.stage_name() == Some("prod"))
            .then_output(|| CreateDeploymentOutput::builder().build());
        let endpoints = ApiGatewayEndpoints::new(mock_client!(aws_sdk_apigateway, RuleMode::MatchAny, [&get, &update, &deploy]));

        assert!(endpoints.is_execute_endpoint_disabled("abc123").await.unwrap());
        endpoints.enable_execute_endpoint("abc123", "prod").await.unwrap();

        assert_eq!(update.num_calls(), 1);
        assert_eq!(deploy.num_calls(), 1);
    }
}
