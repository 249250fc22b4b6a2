//! Directory attributes consumed from the managed desktop and directory services.

use std::fmt;

/// Registration state of a directory with the managed desktop service.
///
/// Values the service may add later are kept verbatim in `Unknown` so they can
/// still be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    Registering,
    Registered,
    Deregistering,
    Deregistered,
    Error,
    Unknown(String),
}

impl RegistrationState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Registering => "REGISTERING",
            Self::Registered => "REGISTERED",
            Self::Deregistering => "DEREGISTERING",
            Self::Deregistered => "DEREGISTERED",
            Self::Error => "ERROR",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered)
    }
}

impl From<&str> for RegistrationState {
    fn from(raw: &str) -> Self {
        match raw {
            "REGISTERING" => Self::Registering,
            "REGISTERED" => Self::Registered,
            "DEREGISTERING" => Self::Deregistering,
            "DEREGISTERED" => Self::Deregistered,
            "ERROR" => Self::Error,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data access capability of a directory in the directory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataAccessStatus {
    Disabled,
    Disabling,
    Enabled,
    Enabling,
    Failed,
    Unknown(String),
}

impl DataAccessStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Disabled => "Disabled",
            Self::Disabling => "Disabling",
            Self::Enabled => "Enabled",
            Self::Enabling => "Enabling",
            Self::Failed => "Failed",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl From<&str> for DataAccessStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "Disabled" => Self::Disabled,
            "Disabling" => Self::Disabling,
            "Enabled" => Self::Enabled,
            "Enabling" => Self::Enabling,
            "Failed" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for DataAccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
