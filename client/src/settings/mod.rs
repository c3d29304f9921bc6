//! Client settings, read from and written back to `settings.ron`.

pub mod animation;
pub mod log;
pub mod session;

pub use animation::{AnimationSettings, SettleDelays};
pub use log::LogSettings;
pub use session::SessionSettings;

use crate::{avatar::AvatarDescriptor, error::Error};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

/// `Settings` contains everything that can be configured in the settings.ron
/// file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub animation: AnimationSettings,
    pub session: SessionSettings,
    pub log: LogSettings,
    /// The fleet spawned on start and restored on a session reset.
    pub avatars: Vec<AvatarDescriptor>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            animation: AnimationSettings::default(),
            session: SessionSettings::default(),
            log: LogSettings::default(),
            avatars: AvatarDescriptor::default_fleet(),
        }
    }
}

impl Settings {
    pub fn load(config_dir: &Path) -> Self {
        let path = Self::get_path(config_dir);

        if let Ok(file) = fs::File::open(&path) {
            match ron::de::from_reader::<_, Self>(file) {
                Ok(s) => return s,
                Err(e) => {
                    warn!(?e, "Failed to parse setting file! Fallback to default.");
                    // Rename the corrupted settings file
                    let new_path = path.with_file_name("settings.invalid.ron");
                    if let Err(e) = fs::rename(&path, &new_path) {
                        warn!(?e, ?path, ?new_path, "Failed to rename settings file.");
                    }
                },
            }
        }
        // This is reached if either:
        // - The file can't be opened (presumably it doesn't exist)
        // - Or there was an error parsing the file
        let default_settings = Self::default();
        default_settings.save_to_file_warn(config_dir);
        default_settings
    }

    pub fn save_to_file_warn(&self, config_dir: &Path) {
        if let Err(e) = self.save_to_file(config_dir) {
            warn!(?e, "Failed to save settings");
        }
    }

    pub fn save_to_file(&self, config_dir: &Path) -> Result<(), Error> {
        let path = Self::get_path(config_dir);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, ron.as_bytes())?;
        Ok(())
    }

    pub fn get_path(config_dir: &Path) -> PathBuf { config_dir.join("settings.ron") }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("humanoid-settings-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = scratch_dir("missing");
        let settings = Settings::load(&dir);
        assert_eq!(settings, Settings::default());
        assert!(Settings::get_path(&dir).exists());
        assert_eq!(Settings::load(&dir), settings);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupted_file_is_set_aside() {
        let dir = scratch_dir("corrupted");
        fs::create_dir_all(&dir).unwrap();
        fs::write(Settings::get_path(&dir), "(animation: oops").unwrap();

        let settings = Settings::load(&dir);
        assert_eq!(settings, Settings::default());
        assert!(dir.join("settings.invalid.ron").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = scratch_dir("partial");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            Settings::get_path(&dir),
            "(animation: (position_threshold: 2.5), session: (session_key: \"abc\"))",
        )
        .unwrap();

        let settings = Settings::load(&dir);
        assert_eq!(settings.animation.position_threshold, 2.5);
        assert_eq!(settings.animation.rotation_threshold, 0.1);
        assert_eq!(settings.session.session_key, "abc");
        assert_eq!(settings.avatars.len(), 6);
        let _ = fs::remove_dir_all(&dir);
    }
}
