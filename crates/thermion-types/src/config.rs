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

use crate::plant::{ApiVersion, PlantKind};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Current configuration schema version; `thermion-main` migrates older files
pub const CONFIG_SCHEMA_VERSION: u32 = 5;

/// Maximum number of heating circuits a plant can expose
pub const MAX_HEATING_CIRCUITS: u8 = 8;
/// Maximum number of buffer tanks
pub const MAX_BUFFERS: u8 = 4;
/// Maximum number of domestic hot water boilers
pub const MAX_BOILERS: u8 = 4;
/// Maximum number of fresh water modules
pub const MAX_FRESH_WATER_MODULES: u8 = 4;

/// Minimum allowed poll interval (seconds)
pub const MIN_SCAN_INTERVAL_SECS: u64 = 5;

/// Main application configuration for one bridged plant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Configuration schema version (see migrations in thermion-main)
    #[serde(default = "default_schema_version")]
    pub version: u32,

    /// Installation name, used as the entity id prefix in Home Assistant
    #[serde(default = "default_name")]
    pub name: String,

    /// Device connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Hardware variant and firmware API version
    #[serde(default)]
    pub plant: PlantSelection,

    /// Enabled subsystems and instance counts
    #[serde(default)]
    pub components: ComponentsConfig,

    /// Home Assistant connection (optional, env fallback)
    #[serde(default)]
    pub ha: HaConfig,

    /// Command/status HTTP API settings
    #[serde(default)]
    pub web: WebConfig,

    /// System behaviour settings
    #[serde(default)]
    pub system: SystemConfig,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_SCHEMA_VERSION,
            name: default_name(),
            connection: ConnectionConfig::default(),
            plant: PlantSelection::default(),
            components: ComponentsConfig::default(),
            ha: HaConfig::default(),
            web: WebConfig::default(),
            system: SystemConfig::default(),
        }
    }
}

impl PlantConfig {
    /// Apply the hardware coupling rules and clamp component counts.
    ///
    /// A vampair plant has no biomass boiler and a therminator/ecotop plant
    /// has no heat pump; whichever flag contradicts the selected variant is
    /// cleared rather than rejected.
    pub fn normalize(&mut self) {
        let c = &mut self.components;
        c.heating_circuits = c.heating_circuits.min(MAX_HEATING_CIRCUITS);
        c.buffers = c.buffers.min(MAX_BUFFERS);
        c.boilers = c.boilers.min(MAX_BOILERS);
        c.fresh_water_modules = c.fresh_water_modules.min(MAX_FRESH_WATER_MODULES);

        match self.plant.kind {
            PlantKind::Vampair => c.biomass_boiler = false,
            PlantKind::Therminator | PlantKind::Ecotop => c.heat_pump = false,
        }
    }

    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("installation name must not be empty");
        }
        if self.connection.host.trim().is_empty() {
            bail!("connection.host must not be empty");
        }
        if self.connection.scan_interval_secs < MIN_SCAN_INTERVAL_SECS {
            bail!(
                "connection.scan_interval_secs must be at least {} (got {})",
                MIN_SCAN_INTERVAL_SECS,
                self.connection.scan_interval_secs
            );
        }
        Ok(())
    }
}

/// Device connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Hostname or IP of the device
    #[serde(default = "default_host")]
    pub host: String,

    /// Modbus TCP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Poll interval in seconds
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            scan_interval_secs: default_scan_interval(),
        }
    }
}

/// Selected hardware variant and firmware API version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantSelection {
    /// Hardware variant
    #[serde(default)]
    pub kind: PlantKind,

    /// Firmware API version of the register interface
    #[serde(default = "default_api_version")]
    pub api_version: ApiVersion,
}

impl Default for PlantSelection {
    fn default() -> Self {
        Self {
            kind: PlantKind::default(),
            api_version: default_api_version(),
        }
    }
}

/// Enabled subsystems and their instance counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentsConfig {
    /// Number of heating circuits (0-8)
    #[serde(default = "default_one")]
    pub heating_circuits: u8,

    /// Number of buffer tanks (0-4)
    #[serde(default = "default_one")]
    pub buffers: u8,

    /// Number of domestic hot water boilers (0-4)
    #[serde(default = "default_one")]
    pub boilers: u8,

    /// Number of fresh water modules (0-4)
    #[serde(default)]
    pub fresh_water_modules: u8,

    /// Heat pump present (vampair only)
    #[serde(default = "default_true")]
    pub heat_pump: bool,

    /// Biomass boiler present (therminator/ecotop only)
    #[serde(default)]
    pub biomass_boiler: bool,

    /// Photovoltaic metering present
    #[serde(default)]
    pub photovoltaic: bool,

    /// Solar thermal collectors present
    #[serde(default)]
    pub solar: bool,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            heating_circuits: 1,
            buffers: 1,
            boilers: 1,
            fresh_water_modules: 0,
            heat_pump: true,
            biomass_boiler: false,
            photovoltaic: false,
            solar: false,
        }
    }
}

/// Home Assistant connection settings
///
/// All fields are optional: the supervisor token takes precedence when
/// running as an addon, and `HA_BASE_URL`/`HA_TOKEN` act as env fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HaConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Command/status HTTP API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Listen port for the bridge API
    #[serde(default = "default_web_port")]
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
        }
    }
}

/// System behaviour settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// When enabled, writes are logged but not sent to the device
    pub debug_mode: bool,
}

fn default_schema_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

fn default_name() -> String {
    "solarfocus".to_owned()
}

fn default_host() -> String {
    "solarfocus".to_owned()
}

fn default_port() -> u16 {
    502
}

fn default_scan_interval() -> u64 {
    10
}

fn default_api_version() -> ApiVersion {
    ApiVersion::latest()
}

fn default_one() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

fn default_web_port() -> u16 {
    8098
}
