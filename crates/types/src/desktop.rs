//! Builder desktop request and identity types.

use std::fmt;

/// Id recorded in place of a real desktop id when creation fails.
pub const FAILED_DESKTOP_ID: &str = "FAILED";

/// Minutes of inactivity before an auto-stop builder desktop shuts down.
pub const AUTO_STOP_TIMEOUT_MINUTES: u32 = 180;

/// Id assigned to a desktop by the managed desktop service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DesktopId(String);

impl DesktopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for DesktopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Power mode of a builder desktop. Builders only ever auto-stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningMode {
    AutoStop,
}

impl RunningMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoStop => "AUTO_STOP",
        }
    }
}

/// Key/value tag attached to provisioned resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

impl ResourceTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Everything needed to ask the desktop service for one builder desktop.
///
/// Encryption is always off for builders and the desktop always auto-stops;
/// [`BuilderDesktopRequest::new`] fixes those values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderDesktopRequest {
    pub directory_id: String,
    pub user_name: String,
    pub bundle_id: String,
    pub root_volume_encryption_enabled: bool,
    pub user_volume_encryption_enabled: bool,
    pub running_mode: RunningMode,
    pub auto_stop_timeout_minutes: u32,
    pub root_volume_size_gib: u32,
    pub user_volume_size_gib: u32,
    pub compute_type: String,
    pub tags: Vec<ResourceTag>,
}

impl BuilderDesktopRequest {
    pub fn new(
        directory_id: impl Into<String>,
        user_name: impl Into<String>,
        bundle_id: impl Into<String>,
        root_volume_size_gib: u32,
        user_volume_size_gib: u32,
        compute_type: impl Into<String>,
    ) -> Self {
        Self {
            directory_id: directory_id.into(),
            user_name: user_name.into(),
            bundle_id: bundle_id.into(),
            root_volume_encryption_enabled: false,
            user_volume_encryption_enabled: false,
            running_mode: RunningMode::AutoStop,
            auto_stop_timeout_minutes: AUTO_STOP_TIMEOUT_MINUTES,
            root_volume_size_gib,
            user_volume_size_gib,
            compute_type: compute_type.into(),
            tags: vec![ResourceTag::new("Automated", "True")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_request_fixes_encryption_mode_and_tags() {
        let request = BuilderDesktopRequest::new("d-1234", "builder", "wsb-5678", 80, 50, "POWER");
        assert!(!request.root_volume_encryption_enabled);
        assert!(!request.user_volume_encryption_enabled);
        assert_eq!(request.running_mode.as_str(), "AUTO_STOP");
        assert_eq!(request.auto_stop_timeout_minutes, 180);
        assert_eq!(request.tags, vec![ResourceTag::new("Automated", "True")]);
    }
}
