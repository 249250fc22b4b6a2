//! Invocation event accepted by the provisioner.
//!
//! Every field is optional. Missing values fall back to function-level defaults,
//! and the two identifiers additionally fall back to the parameter store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input event for a single provisioning run.
///
/// Field names follow the PascalCase keys used by the orchestrator. The legacy
/// `ImageBuilderDirectory` / `ImageBuilderBundleId` keys are separate fields
/// because a forwarded `AutomationParameters` block carries them next to the
/// canonical keys. The canonical key wins when both are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionRequest {
    /// Directory the builder desktop joins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_id: Option<String>,
    /// Legacy spelling of `DirectoryId`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_builder_directory: Option<String>,
    /// Bundle the builder desktop launches from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    /// Legacy spelling of `BundleId`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_builder_bundle_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_builder_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_builder_compute_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_builder_protocol: Option<String>,
    /// Root volume size in GiB. Accepts a number or a numeric string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_builder_root_volume_size: Option<NumberOrText>,
    /// User volume size in GiB. Accepts a number or a numeric string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_builder_user_volume_size: Option<NumberOrText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_builder_security_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
    /// Echoed as sent, so `"True"` and `true` both pass through. Same for the other flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_builder: Option<Value>,
    #[serde(default, rename = "DisableAPI", skip_serializing_if = "Option::is_none")]
    pub disable_api: Option<Value>,
    #[serde(default, rename = "ImageBuilderAPI", skip_serializing_if = "Option::is_none")]
    pub image_builder_api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_tags: Option<Value>,
    #[serde(default, rename = "ImageNotificationARN", skip_serializing_if = "Option::is_none")]
    pub image_notification_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_bundle: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_name_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_compute_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_root_volume_size: Option<NumberOrText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_user_volume_size: Option<NumberOrText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_tags: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_s3_bucket: Option<String>,
    /// Opaque install routine consumed by the install stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_routine: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_windows_updates: Option<Value>,
}

/// A value the orchestrator may send either as a JSON number or a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(u64),
    Text(String),
}

impl NumberOrText {
    /// Interpret the value as a whole number, trimming surrounding whitespace from text.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            NumberOrText::Number(number) => u32::try_from(*number).ok(),
            NumberOrText::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Render the value the way the bundle APIs expect capacities: as a string.
    pub fn to_text(&self) -> String {
        match self {
            NumberOrText::Number(number) => number.to_string(),
            NumberOrText::Text(text) => text.clone(),
        }
    }
}
