//! Default values for settings

use std::path::PathBuf;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
pub const LOG_FORMATS: [&str; 3] = ["json", "pretty", "plain"];

// Generator defaults
pub(super) fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

// Logging defaults
pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_log_format() -> String {
    "pretty".to_string()
}
