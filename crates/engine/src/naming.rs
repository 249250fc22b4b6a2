//! Timestamped names for the captured image and the bundle built from it.

use chrono::{DateTime, Utc};

/// Minute-granularity suffix appended to image and bundle prefixes.
pub const NAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M";

pub fn timestamp_suffix(at: &DateTime<Utc>) -> String {
    at.format(NAME_TIMESTAMP_FORMAT).to_string()
}

/// `<prefix>-YYYY-MM-DD-HH-MM`
pub fn derive_name(prefix: &str, at: &DateTime<Utc>) -> String {
    format!("{}-{}", prefix, timestamp_suffix(at))
}
