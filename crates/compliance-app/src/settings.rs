use anyhow::Context;
use compliance_graph::{RadialLayoutConfig, TypeVisibility};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User-tunable view configuration. Every field has a default, so a settings
/// file only needs to name what it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub layout: RadialLayoutConfig,
    pub initial_visibility: TypeVisibility,
}

impl ViewSettings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        tracing::info!("Loaded view settings from {}", path.display());
        Ok(settings)
    }

    /// Like [`ViewSettings::load`], but a missing or broken file falls back to
    /// defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("Settings file {} not found, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::error!("{err:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings file {}", path.display()))?;
        Ok(())
    }
}
