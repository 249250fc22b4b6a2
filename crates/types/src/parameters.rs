//! The parameter bundle returned to the orchestrator on success.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat set of values consumed by the later image-build stages.
///
/// Key spelling is part of the contract with the state machine, so acronym
/// keys (`ImageBuilderAPI`, `DisableAPI`, `ImageNotificationARN`) are renamed
/// explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AutomationParameters {
    pub image_builder_user: String,
    /// Provisioned desktop id, or `FAILED` when creation did not succeed.
    pub image_builder_work_space_id: String,
    pub image_builder_directory: String,
    pub image_builder_bundle_id: String,
    pub image_builder_protocol: String,
    pub image_builder_root_volume_size: u32,
    pub image_builder_user_volume_size: u32,
    pub image_builder_compute_type: String,
    pub image_builder_security_group: String,
    /// Echoed as received; defaults to a JSON boolean when the event omits it.
    pub delete_builder: Value,
    #[serde(rename = "ImageBuilderAPI")]
    pub image_builder_api: String,
    #[serde(rename = "DisableAPI")]
    pub disable_api: Value,
    pub image_name_prefix: String,
    pub image_name: String,
    pub image_description: String,
    pub image_tags: Value,
    #[serde(rename = "ImageNotificationARN")]
    pub image_notification_arn: String,
    pub image_builder_id_array: WorkspaceIdEntry,
    pub create_bundle: Value,
    pub bundle_name_prefix: String,
    pub bundle_name: String,
    pub bundle_description: String,
    pub bundle_compute_type: ComputeTypeDescriptor,
    pub bundle_root_volume_size: CapacityDescriptor,
    pub bundle_user_volume_size: CapacityDescriptor,
    pub bundle_tags: Value,
    pub software_s3_bucket: String,
    pub install_routine: Value,
    pub skip_windows_updates: Value,
    pub pre_existing_builder: bool,
}

/// `{"WorkspaceId": ...}` entry used by stages that act on a list of desktops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceIdEntry {
    #[serde(rename = "WorkspaceId")]
    pub workspace_id: String,
}

/// `{"Name": ...}` compute type shape expected by the bundle API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputeTypeDescriptor {
    #[serde(rename = "Name")]
    pub name: String,
}

/// `{"Capacity": ...}` volume shape expected by the bundle API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapacityDescriptor {
    #[serde(rename = "Capacity")]
    pub capacity: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> AutomationParameters {
        AutomationParameters {
            image_builder_user: "builder".into(),
            image_builder_work_space_id: "ws-abcde".into(),
            image_builder_directory: "d-1234".into(),
            image_builder_bundle_id: "wsb-5678".into(),
            image_builder_protocol: "PCOIP".into(),
            image_builder_root_volume_size: 80,
            image_builder_user_volume_size: 50,
            image_builder_compute_type: "POWER".into(),
            image_builder_security_group: "sg-1".into(),
            delete_builder: Value::Bool(true),
            image_builder_api: "api-1".into(),
            disable_api: Value::Bool(true),
            image_name_prefix: "golden".into(),
            image_name: "golden-2024-05-01-09-30".into(),
            image_description: "Default".into(),
            image_tags: Value::Bool(false),
            image_notification_arn: "arn:aws:sns:us-east-1:123456789012:images".into(),
            image_builder_id_array: WorkspaceIdEntry {
                workspace_id: "ws-abcde".into(),
            },
            create_bundle: Value::Bool(false),
            bundle_name_prefix: "golden-bundle".into(),
            bundle_name: "golden-bundle-2024-05-01-09-30".into(),
            bundle_description: "Created with automated pipeline".into(),
            bundle_compute_type: ComputeTypeDescriptor { name: "POWER".into() },
            bundle_root_volume_size: CapacityDescriptor { capacity: "80".into() },
            bundle_user_volume_size: CapacityDescriptor { capacity: "50".into() },
            bundle_tags: Value::Bool(false),
            software_s3_bucket: "software-bucket".into(),
            install_routine: Value::Bool(false),
            skip_windows_updates: Value::Bool(true),
            pre_existing_builder: false,
        }
    }

    #[test]
    fn serializes_with_orchestrator_key_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "ImageBuilderWorkSpaceId",
            "ImageBuilderAPI",
            "DisableAPI",
            "ImageNotificationARN",
            "SoftwareS3Bucket",
            "PreExistingBuilder",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert_eq!(object.len(), 30);
        assert_eq!(value["ImageBuilderIdArray"], json!({"WorkspaceId": "ws-abcde"}));
        assert_eq!(value["BundleComputeType"], json!({"Name": "POWER"}));
        assert_eq!(value["BundleRootVolumeSize"], json!({"Capacity": "80"}));
        assert_eq!(value["ImageBuilderRootVolumeSize"], json!(80));
        assert_eq!(value["DisableAPI"], json!(true));
        assert_eq!(value["PreExistingBuilder"], json!(false));
    }
}
