//! Startup configuration for the provisioner.
//!
//! Values come from the function environment and are read once when the
//! process starts. Event fields can override most of them per invocation; see
//! [`crate::resolve`].

use std::env;

use thiserror::Error;

/// Parameter store key holding the fallback directory id.
pub const DIRECTORY_ID_PARAMETER: &str = "/developer-environment-platform/ds/directory_id";

pub const DIRECTORY_ID_ENV: &str = "DirectoryId";
pub const BUNDLE_ID_ENV: &str = "BundleId";
pub const DIRECTORY_PARAMETER_ENV: &str = "DirectoryIdParameter";
pub const BUILDER_USER_ENV: &str = "Default_WorkSpaceUser";
pub const COMPUTE_TYPE_ENV: &str = "Default_ComputeType";
pub const PROTOCOL_ENV: &str = "Default_Protocol";
pub const ROOT_VOLUME_SIZE_ENV: &str = "Default_RootVolumeSize";
pub const USER_VOLUME_SIZE_ENV: &str = "Default_UserVolumeSize";
pub const SECURITY_GROUP_ENV: &str = "Default_SecurityGroup";
pub const IMAGE_PREFIX_ENV: &str = "Default_ImagePrefix";
pub const BUNDLE_PREFIX_ENV: &str = "Default_BundlePrefix";
pub const API_ID_ENV: &str = "Default_APIId";
pub const NOTIFICATION_ARN_ENV: &str = "Default_NotificationARN";
pub const S3_BUCKET_ENV: &str = "Default_S3Bucket";

const DEFAULT_BUILDER_USER: &str = "wsimagebuilder";
const DEFAULT_COMPUTE_TYPE: &str = "POWER";
const DEFAULT_PROTOCOL: &str = "PCOIP";
const DEFAULT_ROOT_VOLUME_SIZE: u32 = 80;
const DEFAULT_USER_VOLUME_SIZE: u32 = 50;
const DEFAULT_IMAGE_PREFIX: &str = "wsimage";
const DEFAULT_BUNDLE_PREFIX: &str = "wsbundle";

/// Error raised when the function environment cannot be turned into a config.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{variable} must be a whole number, got '{value}'")]
    InvalidNumber { variable: &'static str, value: String },
}

/// Function-level defaults injected into [`crate::BuilderProvisioner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerConfig {
    /// Default directory id; `None` defers to the parameter store.
    pub directory_id: Option<String>,
    /// Default bundle id.
    pub bundle_id: Option<String>,
    /// Parameter store key consulted when no directory id is supplied.
    pub directory_parameter: String,
    pub builder_user: String,
    pub compute_type: String,
    pub protocol: String,
    pub root_volume_size: u32,
    pub user_volume_size: u32,
    pub security_group: String,
    pub image_prefix: String,
    pub bundle_prefix: String,
    /// REST API id of the automation endpoint. Empty skips the endpoint check.
    pub api_id: String,
    pub notification_arn: String,
    pub s3_bucket: String,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            directory_id: None,
            bundle_id: None,
            directory_parameter: DIRECTORY_ID_PARAMETER.to_string(),
            builder_user: DEFAULT_BUILDER_USER.to_string(),
            compute_type: DEFAULT_COMPUTE_TYPE.to_string(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            root_volume_size: DEFAULT_ROOT_VOLUME_SIZE,
            user_volume_size: DEFAULT_USER_VOLUME_SIZE,
            security_group: String::new(),
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
            bundle_prefix: DEFAULT_BUNDLE_PREFIX.to_string(),
            api_id: String::new(),
            notification_arn: String::new(),
            s3_bucket: String::new(),
        }
    }
}

impl ProvisionerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let read_number = |name: &'static str, default: u32| match read(name) {
            Some(value) => value.parse::<u32>().map_err(|_| ConfigError::InvalidNumber { variable: name, value }),
            None => Ok(default),
        };

        let defaults = Self::default();
        Ok(Self {
            directory_id: read(DIRECTORY_ID_ENV),
            bundle_id: read(BUNDLE_ID_ENV),
            directory_parameter: read(DIRECTORY_PARAMETER_ENV).unwrap_or(defaults.directory_parameter),
            builder_user: read(BUILDER_USER_ENV).unwrap_or(defaults.builder_user),
            compute_type: read(COMPUTE_TYPE_ENV).unwrap_or(defaults.compute_type),
            protocol: read(PROTOCOL_ENV).unwrap_or(defaults.protocol),
            root_volume_size: read_number(ROOT_VOLUME_SIZE_ENV, defaults.root_volume_size)?,
            user_volume_size: read_number(USER_VOLUME_SIZE_ENV, defaults.user_volume_size)?,
            security_group: read(SECURITY_GROUP_ENV).unwrap_or(defaults.security_group),
            image_prefix: read(IMAGE_PREFIX_ENV).unwrap_or(defaults.image_prefix),
            bundle_prefix: read(BUNDLE_PREFIX_ENV).unwrap_or(defaults.bundle_prefix),
            api_id: read(API_ID_ENV).unwrap_or(defaults.api_id),
            notification_arn: read(NOTIFICATION_ARN_ENV).unwrap_or(defaults.notification_arn),
            s3_bucket: read(S3_BUCKET_ENV).unwrap_or(defaults.s3_bucket),
        })
    }
}
