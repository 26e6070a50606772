// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of ThermION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Configuration loading and persistence.

use crate::migrations;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use thermion_types::PlantConfig;
use tracing::{info, warn};

const PRODUCTION_CONFIG_PATH: &str = "/data/thermion.toml";
const DEV_CONFIG_PATH: &str = "config.toml";

/// Configuration persistence manager
pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Default persistence manager for production (/data/thermion.toml)
    pub fn default_production() -> Self {
        Self::new(PRODUCTION_CONFIG_PATH)
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Load configuration, applying schema migrations before typed
    /// deserialization
    pub fn load(&self) -> Result<PlantConfig> {
        let contents = fs::read_to_string(&self.config_path).context(format!(
            "Failed to read config from {}",
            self.config_path.display()
        ))?;

        let raw: toml::Value = toml::from_str(&contents).context("Failed to parse config TOML")?;
        let migrated = migrations::migrate(raw);
        let config: PlantConfig = migrated
            .try_into()
            .context("Failed to deserialize config")?;

        info!(
            "Loaded configuration from {}",
            self.config_path.display()
        );
        Ok(config)
    }

    /// Save configuration atomically (write + rename)
    pub fn save(&self, config: &PlantConfig) -> Result<()> {
        config.validate()?;

        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory {}",
                parent.display()
            ))?;
        }

        let text = toml::to_string_pretty(config)?;
        let temp_path = self.config_path.with_extension("tmp");
        fs::write(&temp_path, text).context(format!(
            "Failed to write config to {}",
            self.config_path.display()
        ))?;
        fs::rename(&temp_path, &self.config_path)?;

        info!("Saved configuration to {}", self.config_path.display());
        Ok(())
    }
}

/// Load configuration with fallback logic
///
/// 1. Try /data/thermion.toml (persistent addon storage)
/// 2. Try config.toml (development)
/// 3. Fall back to defaults
///
/// The result is normalized, validated and persisted on first run.
pub fn load_config_with_fallback() -> Result<PlantConfig> {
    let persistence = ConfigPersistence::default_production();

    let mut config = if persistence.exists() {
        persistence.load()?
    } else if PathBuf::from(DEV_CONFIG_PATH).exists() {
        info!("No persistent config, loading {DEV_CONFIG_PATH}");
        ConfigPersistence::new(DEV_CONFIG_PATH).load()?
    } else {
        warn!("No configuration found, starting with defaults");
        PlantConfig::default()
    };

    config.normalize();
    config.validate()?;

    if !persistence.exists() {
        if let Err(e) = persistence.save(&config) {
            warn!("Failed to persist initial config: {e:#}");
        }
    }

    Ok(config)
}
