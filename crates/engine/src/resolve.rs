//! Precedence rules layering an invocation event over startup configuration.
//!
//! Everything here is pure: no external calls, no clock. The one tier that
//! needs a network round trip (the parameter store fallback for the directory
//! id) lives in the provisioner.

use serde_json::Value;
use wsimage_types::{NumberOrText, ProvisionRequest};

use crate::{ProvisionError, ProvisionerConfig};

const DEFAULT_IMAGE_DESCRIPTION: &str = "Default";
const DEFAULT_BUNDLE_DESCRIPTION: &str = "Created with automated pipeline";

/// Pick the first non-blank identifier, in the order given.
///
/// ```
/// use wsimage_engine::resolve_identifier;
///
/// assert_eq!(resolve_identifier([Some("d-event"), Some("d-env")]).as_deref(), Some("d-event"));
/// assert_eq!(resolve_identifier([Some(" "), None, Some("d-env")]).as_deref(), Some("d-env"));
/// assert_eq!(resolve_identifier([None, None]), None);
/// ```
pub fn resolve_identifier<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Every pass-through value after event overrides have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub builder_user: String,
    pub compute_type: String,
    pub protocol: String,
    pub root_volume_size: u32,
    pub user_volume_size: u32,
    pub security_group: String,
    pub image_name_prefix: String,
    pub image_description: String,
    pub delete_builder: Value,
    pub disable_api: Value,
    pub api_id: String,
    pub image_tags: Value,
    pub notification_arn: String,
    pub create_bundle: Value,
    pub bundle_name_prefix: String,
    pub bundle_description: String,
    pub bundle_compute_type: String,
    pub bundle_root_volume_size: String,
    pub bundle_user_volume_size: String,
    pub bundle_tags: Value,
    pub s3_bucket: String,
    pub install_routine: Value,
    pub skip_windows_updates: Value,
}

/// Layer the event's optional overrides over the configured defaults.
///
/// A key present on the event wins even when its value is an empty string;
/// only the two identifiers treat blank values as missing.
pub fn resolve_settings(request: &ProvisionRequest, config: &ProvisionerConfig) -> Result<ResolvedSettings, ProvisionError> {
    Ok(ResolvedSettings {
        builder_user: text_or(&request.image_builder_user, &config.builder_user),
        compute_type: text_or(&request.image_builder_compute_type, &config.compute_type),
        protocol: text_or(&request.image_builder_protocol, &config.protocol),
        root_volume_size: size_or("ImageBuilderRootVolumeSize", &request.image_builder_root_volume_size, config.root_volume_size)?,
        user_volume_size: size_or("ImageBuilderUserVolumeSize", &request.image_builder_user_volume_size, config.user_volume_size)?,
        security_group: text_or(&request.image_builder_security_group, &config.security_group),
        image_name_prefix: text_or(&request.image_name_prefix, &config.image_prefix),
        image_description: text_or(&request.image_description, DEFAULT_IMAGE_DESCRIPTION),
        delete_builder: flag_or(&request.delete_builder, true),
        disable_api: flag_or(&request.disable_api, true),
        api_id: text_or(&request.image_builder_api, &config.api_id),
        image_tags: json_or_false(&request.image_tags),
        notification_arn: text_or(&request.image_notification_arn, &config.notification_arn),
        create_bundle: flag_or(&request.create_bundle, false),
        bundle_name_prefix: text_or(&request.bundle_name_prefix, &config.bundle_prefix),
        bundle_description: text_or(&request.bundle_description, DEFAULT_BUNDLE_DESCRIPTION),
        bundle_compute_type: text_or(&request.bundle_compute_type, &config.compute_type),
        bundle_root_volume_size: capacity_or(&request.bundle_root_volume_size, config.root_volume_size),
        bundle_user_volume_size: capacity_or(&request.bundle_user_volume_size, config.user_volume_size),
        bundle_tags: json_or_false(&request.bundle_tags),
        s3_bucket: text_or(&request.software_s3_bucket, &config.s3_bucket),
        install_routine: json_or_false(&request.install_routine),
        skip_windows_updates: flag_or(&request.skip_windows_updates, true),
    })
}

fn text_or(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}

fn size_or(name: &'static str, value: &Option<NumberOrText>, default: u32) -> Result<u32, ProvisionError> {
    match value {
        Some(raw) => raw.as_u32().ok_or_else(|| ProvisionError::InvalidParameter {
            name,
            value: raw.to_text(),
        }),
        None => Ok(default),
    }
}

fn capacity_or(value: &Option<NumberOrText>, default: u32) -> String {
    value.as_ref().map(NumberOrText::to_text).unwrap_or_else(|| default.to_string())
}

fn flag_or(value: &Option<Value>, default: bool) -> Value {
    value.clone().unwrap_or(Value::Bool(default))
}

// Tag sets and install routines are `false` when absent.
fn json_or_false(value: &Option<Value>) -> Value {
    value.clone().unwrap_or(Value::Bool(false))
}
