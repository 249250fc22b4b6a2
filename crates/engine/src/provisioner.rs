//! Builder desktop provisioning.
//!
//! [`BuilderProvisioner`] runs the calls in a fixed order and stops at the
//! first failed check. Each remote call waits on the previous one; nothing
//! runs concurrently within an invocation.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use wsimage_api::{ApiError, ServiceClients};
use wsimage_types::{
    AutomationParameters, BuilderDesktopRequest, CapacityDescriptor, ComputeTypeDescriptor, DesktopId, FAILED_DESKTOP_ID,
    ProvisionRequest, WorkspaceIdEntry,
};

use crate::{
    ProvisionError, ProvisionerConfig,
    naming::derive_name,
    resolve::{ResolvedSettings, resolve_identifier, resolve_settings},
};

/// Stage redeployed after the automation API's default endpoint is re-enabled.
pub const API_DEPLOYMENT_STAGE: &str = "prod";

/// Result of a run that got past every check.
///
/// `desktop` keeps the typed creation outcome; `parameters` carries the
/// `FAILED` sentinel when it is an error.
#[derive(Debug)]
pub struct ProvisionOutcome {
    pub parameters: AutomationParameters,
    pub desktop: Result<DesktopId, ApiError>,
}

/// Validates a directory and provisions one builder desktop in it.
///
/// Holds the startup configuration and one handle per external service.
/// Both are read-only, so a single provisioner serves every invocation.
#[derive(Clone)]
pub struct BuilderProvisioner {
    config: ProvisionerConfig,
    clients: ServiceClients,
}

impl BuilderProvisioner {
    pub fn new(config: ProvisionerConfig, clients: ServiceClients) -> Self {
        Self { config, clients }
    }

    /// Provision using the current time for derived names.
    pub async fn provision(&self, request: &ProvisionRequest) -> Result<ProvisionOutcome, ProvisionError> {
        self.provision_at(request, Utc::now()).await
    }

    /// Provision with an explicit timestamp for derived names.
    pub async fn provision_at(&self, request: &ProvisionRequest, now: DateTime<Utc>) -> Result<ProvisionOutcome, ProvisionError> {
        info!("beginning builder desktop provisioning");
        let settings = resolve_settings(request, &self.config)?;

        let directory_id = self.resolve_directory_id(request).await?;
        let bundle_id = resolve_identifier([
            request.bundle_id.as_deref(),
            request.image_builder_bundle_id.as_deref(),
            self.config.bundle_id.as_deref(),
        ])
        .ok_or_else(ProvisionError::missing_bundle_id)?;
        info!(%directory_id, %bundle_id, "resolved builder identifiers");

        self.ensure_directory_registered(&directory_id).await?;
        self.ensure_data_access_enabled(&directory_id).await?;
        // Last fatal check. Nothing after desktop creation may abort the run.
        self.ensure_api_endpoint_enabled(&settings.api_id).await?;

        let desktop_request = BuilderDesktopRequest::new(
            &directory_id,
            &settings.builder_user,
            &bundle_id,
            settings.root_volume_size,
            settings.user_volume_size,
            &settings.compute_type,
        );
        let desktop = self.create_builder_desktop(&desktop_request).await;

        let image_name = derive_name(&settings.image_name_prefix, &now);
        let bundle_name = derive_name(&settings.bundle_name_prefix, &now);
        info!(%image_name, %bundle_name, "derived image and bundle names");

        let workspace_id = match &desktop {
            Ok(id) => id.to_string(),
            Err(_) => FAILED_DESKTOP_ID.to_string(),
        };
        let parameters = assemble_parameters(settings, directory_id, bundle_id, workspace_id, image_name, bundle_name);
        Ok(ProvisionOutcome { parameters, desktop })
    }

    async fn resolve_directory_id(&self, request: &ProvisionRequest) -> Result<String, ProvisionError> {
        if let Some(directory_id) = resolve_identifier([
            request.directory_id.as_deref(),
            request.image_builder_directory.as_deref(),
            self.config.directory_id.as_deref(),
        ]) {
            return Ok(directory_id);
        }

        let parameter = self.config.directory_parameter.as_str();
        info!(%parameter, "directory id not supplied, reading parameter store");
        match self.clients.parameters.get_parameter(parameter).await {
            Ok(value) => resolve_identifier([value.as_deref()]).ok_or_else(ProvisionError::missing_directory_id),
            Err(error) => {
                warn!(%parameter, %error, "parameter store lookup failed");
                Err(ProvisionError::missing_directory_id())
            }
        }
    }

    async fn ensure_directory_registered(&self, directory_id: &str) -> Result<(), ProvisionError> {
        let state = self
            .clients
            .desktops
            .describe_directory(directory_id)
            .await
            .map_err(log_external_failure)?
            .ok_or_else(|| ProvisionError::DirectoryNotFound {
                directory_id: directory_id.to_string(),
            })?;

        info!(%directory_id, %state, "directory registration state");
        if !state.is_registered() {
            return Err(ProvisionError::DirectoryNotRegistered {
                directory_id: directory_id.to_string(),
                state,
            });
        }
        Ok(())
    }

    async fn ensure_data_access_enabled(&self, directory_id: &str) -> Result<(), ProvisionError> {
        let status = self
            .clients
            .data_access
            .describe_data_access(directory_id)
            .await
            .map_err(log_external_failure)?;

        info!(%directory_id, %status, "directory data access status");
        if !status.is_enabled() {
            return Err(ProvisionError::DataAccessDisabled {
                directory_id: directory_id.to_string(),
                status,
            });
        }
        Ok(())
    }

    async fn create_builder_desktop(&self, request: &BuilderDesktopRequest) -> Result<DesktopId, ApiError> {
        info!(
            directory_id = %request.directory_id,
            user = %request.user_name,
            bundle_id = %request.bundle_id,
            "requesting builder desktop"
        );
        match self.clients.desktops.create_desktop(request).await {
            Ok(desktop_id) => {
                info!(%desktop_id, "builder desktop creation in progress");
                Ok(desktop_id)
            }
            Err(error) => {
                error!(operation = error.operation(), %error, "unable to deploy builder desktop for image creation");
                Err(error)
            }
        }
    }

    async fn ensure_api_endpoint_enabled(&self, api_id: &str) -> Result<(), ProvisionError> {
        if api_id.is_empty() {
            info!("no automation API configured, skipping endpoint check");
            return Ok(());
        }

        info!(%api_id, "checking status of automation API endpoint");
        let disabled = self
            .clients
            .endpoints
            .is_execute_endpoint_disabled(api_id)
            .await
            .map_err(log_external_failure)?;
        if !disabled {
            info!(%api_id, "automation API endpoint already enabled");
            return Ok(());
        }

        info!(%api_id, "automation API endpoint is disabled, enabling");
        self.clients
            .endpoints
            .enable_execute_endpoint(api_id, API_DEPLOYMENT_STAGE)
            .await
            .map_err(log_external_failure)?;
        info!(%api_id, stage = API_DEPLOYMENT_STAGE, "automation API deployed");
        Ok(())
    }
}

fn log_external_failure(error: ApiError) -> ProvisionError {
    error!(operation = error.operation(), %error, "external service call failed");
    ProvisionError::ExternalService(error)
}

fn assemble_parameters(
    settings: ResolvedSettings,
    directory_id: String,
    bundle_id: String,
    workspace_id: String,
    image_name: String,
    bundle_name: String,
) -> AutomationParameters {
    AutomationParameters {
        image_builder_user: settings.builder_user,
        image_builder_id_array: WorkspaceIdEntry {
            workspace_id: workspace_id.clone(),
        },
        image_builder_work_space_id: workspace_id,
        image_builder_directory: directory_id,
        image_builder_bundle_id: bundle_id,
        image_builder_protocol: settings.protocol,
        image_builder_root_volume_size: settings.root_volume_size,
        image_builder_user_volume_size: settings.user_volume_size,
        image_builder_compute_type: settings.compute_type,
        image_builder_security_group: settings.security_group,
        delete_builder: settings.delete_builder,
        image_builder_api: settings.api_id,
        disable_api: settings.disable_api,
        image_name_prefix: settings.image_name_prefix,
        image_name,
        image_description: settings.image_description,
        image_tags: settings.image_tags,
        image_notification_arn: settings.notification_arn,
        create_bundle: settings.create_bundle,
        bundle_name_prefix: settings.bundle_name_prefix,
        bundle_name,
        bundle_description: settings.bundle_description,
        bundle_compute_type: ComputeTypeDescriptor {
            name: settings.bundle_compute_type,
        },
        bundle_root_volume_size: CapacityDescriptor {
            capacity: settings.bundle_root_volume_size,
        },
        bundle_user_volume_size: CapacityDescriptor {
            capacity: settings.bundle_user_volume_size,
        },
        bundle_tags: settings.bundle_tags,
        software_s3_bucket: settings.s3_bucket,
        install_routine: settings.install_routine,
        skip_windows_updates: settings.skip_windows_updates,
        pre_existing_builder: false,
    }
}
