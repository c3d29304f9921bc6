use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub log_to_file: bool,
    /// Relative paths are resolved against the config directory.
    pub logs_path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_to_file: true,
            logs_path: PathBuf::from("logs"),
        }
    }
}
