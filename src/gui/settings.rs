use anyhow::{Context, Result};
use ptouch_composer::DEFAULT_PRINTER_COMMAND;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// GUI preferences kept between sessions. The label queue itself is never saved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuiSettings {
    pub printer_command: String,
    pub show_command: bool,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            printer_command: DEFAULT_PRINTER_COMMAND.to_string(),
            show_command: true,
        }
    }
}

impl GuiSettings {
    /// Location of the settings file inside the user config directory
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ptouch-composer").join("settings.json"))
    }

    /// Load settings, falling back to defaults when the file is missing or unreadable
    pub fn load() -> Self {
        Self::config_path()
            .filter(|path| path.exists())
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {:?}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings: {:?}", path))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("No configuration directory available"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write settings: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = GuiSettings {
            printer_command: "/usr/local/bin/ptouch-print".to_string(),
            show_command: false,
        };

        settings.save_to(&path).unwrap();
        assert_eq!(GuiSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"showCommand": false}"#).unwrap();

        let settings = GuiSettings::load_from(&path).unwrap();
        assert_eq!(settings.printer_command, "ptouch-print");
        assert!(!settings.show_command);
    }
}
