// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Configuration system

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::materials::{ClassifierConfig, MaterialCategory, MaterialRegistry};
use crate::precache::PrecacheManifest;
use crate::trial::TRIAL_DAYS;
use crate::units::SceneUnit;

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "meshtally.toml";

/// Meshtally configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshtallyConfig {
    /// Linear unit of the scene coordinates
    pub unit: SceneUnit,
    /// Category used when a part cannot be classified
    pub default_material: MaterialCategory,
    /// Verbose output
    pub verbose: bool,
    /// Display labels of the four material roles
    pub materials: MaterialRegistry,
    /// Classification thresholds and name rules
    pub classifier: ClassifierConfig,
    pub trial: TrialSettings,
    pub precache: PrecacheManifest,
}

/// Trial gate settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialSettings {
    /// JSON file holding the trial keys
    pub store: PathBuf,
    /// Length of the trial window
    pub days: i64,
}

impl Default for TrialSettings {
    fn default() -> Self {
        Self {
            store: PathBuf::from(".meshtally/trial.json"),
            days: TRIAL_DAYS,
        }
    }
}

impl Default for MeshtallyConfig {
    fn default() -> Self {
        Self {
            unit: SceneUnit::default(),
            default_material: MaterialCategory::Sheet,
            verbose: false,
            materials: MaterialRegistry::default(),
            classifier: ClassifierConfig::default(),
            trial: TrialSettings::default(),
            precache: PrecacheManifest::default(),
        }
    }
}

impl MeshtallyConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: MeshtallyConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `MESHTALLY_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(unit) = var("MESHTALLY_UNIT") {
            self.unit = unit.parse().context("Invalid MESHTALLY_UNIT")?;
        }

        if let Some(material) = var("MESHTALLY_DEFAULT_MATERIAL") {
            self.default_material = material
                .parse()
                .context("Invalid MESHTALLY_DEFAULT_MATERIAL")?;
        }

        if let Some(store) = var("MESHTALLY_TRIAL_STORE") {
            self.trial.store = PathBuf::from(store);
        }

        if let Some(verbose) = var("MESHTALLY_VERBOSE") {
            self.verbose = verbose.parse().unwrap_or(false);
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::NameRule;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: MeshtallyConfig = toml::from_str(
            r#"
            unit = "cm"

            [materials]
            sheet = "ACO (m²)"

            [classifier.thresholds]
            small_part_max_mm = 25.0
            "#,
        )
        .unwrap();

        assert_eq!(config.unit, SceneUnit::Centimeter);
        assert_eq!(config.materials.sheet, "ACO (m²)");
        assert_eq!(config.materials.unit, "UNITARIO (un)");
        assert_eq!(config.classifier.thresholds.small_part_max_mm, 25.0);
        assert_eq!(config.classifier.thresholds.thin_floor_mm, 10.0);
        assert_eq!(config.classifier.name_rules.len(), 4);
        assert_eq!(config.trial.days, 5);
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(CONFIG_FILE);

        let mut config = MeshtallyConfig {
            unit: SceneUnit::Meter,
            default_material: MaterialCategory::Volume,
            ..MeshtallyConfig::default()
        };
        config
            .classifier
            .name_rules
            .push(NameRule::new(MaterialCategory::Unit, &["PARAFUSO"]));
        config.save(&path)?;

        let loaded = MeshtallyConfig::from_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MESHTALLY_UNIT", "m"),
            ("MESHTALLY_DEFAULT_MATERIAL", "linear"),
            ("MESHTALLY_TRIAL_STORE", "/tmp/trial.json"),
            ("MESHTALLY_VERBOSE", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = MeshtallyConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.unit, SceneUnit::Meter);
        assert_eq!(config.default_material, MaterialCategory::Linear);
        assert_eq!(config.trial.store, PathBuf::from("/tmp/trial.json"));
        assert!(config.verbose);
    }

    #[test]
    fn test_invalid_env_unit_is_rejected() {
        let mut config = MeshtallyConfig::default();
        assert!(config
            .apply_overrides(|key| (key == "MESHTALLY_UNIT").then(|| "yd".to_string()))
            .is_err());
    }
}
