//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use shack_catalog::{find_by_id, HardwareRecord};

/// Saved selections for the radio daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RadioSelection {
    /// Last selected hardware id, if any
    #[serde(default)]
    pub model_id: Option<u32>,
    #[serde(default)]
    pub serial_port: String,
    #[serde(default = "default_baud")]
    pub baud: u32,
    /// CI-V bus address text (Icom models only)
    #[serde(default = "default_civ")]
    pub civ_address: String,
    #[serde(default)]
    pub ptt_enabled: bool,
    #[serde(default)]
    pub ptt_port: String,
    #[serde(default = "default_ptt_signal")]
    pub ptt_signal: String,
    #[serde(default = "default_radio_tcp")]
    pub tcp_port: u16,
}

impl Default for RadioSelection {
    fn default() -> Self {
        Self {
            model_id: None,
            serial_port: String::new(),
            baud: default_baud(),
            civ_address: default_civ(),
            ptt_enabled: false,
            ptt_port: String::new(),
            ptt_signal: default_ptt_signal(),
            tcp_port: default_radio_tcp(),
        }
    }
}

/// Saved selections for the rotator daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RotorSelection {
    #[serde(default)]
    pub model_id: Option<u32>,
    #[serde(default)]
    pub serial_port: String,
    #[serde(default = "default_baud")]
    pub baud: u32,
    #[serde(default = "default_rotor_tcp")]
    pub tcp_port: u16,
}

impl Default for RotorSelection {
    fn default() -> Self {
        Self {
            model_id: None,
            serial_port: String::new(),
            baud: default_baud(),
            tcp_port: default_rotor_tcp(),
        }
    }
}

/// Saved selections for the amplifier daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AmplifierSelection {
    #[serde(default)]
    pub model_id: Option<u32>,
    #[serde(default)]
    pub serial_port: String,
    #[serde(default = "default_baud")]
    pub baud: u32,
    #[serde(default = "default_amp_tcp")]
    pub tcp_port: u16,
}

impl Default for AmplifierSelection {
    fn default() -> Self {
        Self {
            model_id: None,
            serial_port: String::new(),
            baud: default_baud(),
            tcp_port: default_amp_tcp(),
        }
    }
}

fn default_baud() -> u32 {
    9600
}

fn default_civ() -> String {
    "00h".to_string()
}

fn default_ptt_signal() -> String {
    "RTS".to_string()
}

fn default_radio_tcp() -> u16 {
    4532
}

fn default_rotor_tcp() -> u16 {
    4533
}

fn default_amp_tcp() -> u16 {
    4534
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    #[serde(default)]
    pub radio: RadioSelection,
    #[serde(default)]
    pub rotor: RotorSelection,
    #[serde(default)]
    pub amplifier: AmplifierSelection,
    /// Whether the live output pane is shown
    #[serde(default)]
    pub show_output: bool,
}

impl Settings {
    /// Get the config directory for shackmate.
    /// Uses $XDG_CONFIG_HOME/shackmate when set, falls back to
    /// ~/.config/shackmate.
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("shackmate"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("shackmate"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location; missing or unreadable
    /// files yield defaults.
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&text) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("settings file unreadable, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<(), String> {
        let path =
            Self::settings_path().ok_or_else(|| "Could not determine settings path".to_string())?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, json).map_err(|e| format!("Failed to write settings: {}", e))
    }
}

/// Restore a stored hardware selection against freshly listed records.
///
/// `None` both when nothing was stored and when the stored id no longer
/// exists in the catalog; a vanished model must stay unselected rather
/// than silently become the first entry.
pub fn restore_selection<'a>(
    records: &'a [HardwareRecord],
    stored_id: Option<u32>,
) -> Option<&'a HardwareRecord> {
    stored_id.and_then(|id| find_by_id(records, id))
}
