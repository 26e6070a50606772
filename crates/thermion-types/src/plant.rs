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

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported Solarfocus plant variants
/// This enum defines all hardware systems that ThermION can bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlantKind {
    /// Heat pump vampair (air-to-water heat pump)
    #[default]
    Vampair,
    /// Biomass boiler therminator II
    Therminator,
    /// Biomass boiler EcoTop
    Ecotop,
    // Future plant variants can be added here:
    // Octoplus,
    // Pelletelegance,
}

impl PlantKind {
    /// Get human-readable name for the plant variant
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Vampair => "Heat pump vampair",
            Self::Therminator => "Biomass boiler therminator II",
            Self::Ecotop => "Biomass boiler EcoTop",
        }
    }

    /// Get config string value (lowercase)
    pub fn to_config_value(&self) -> &'static str {
        match self {
            Self::Vampair => "vampair",
            Self::Therminator => "therminator",
            Self::Ecotop => "ecotop",
        }
    }

    /// Whether the variant is driven by a biomass boiler
    pub fn is_biomass(&self) -> bool {
        matches!(self, Self::Therminator | Self::Ecotop)
    }

    /// List all supported plant variants
    pub fn all() -> &'static [PlantKind] {
        &[Self::Vampair, Self::Therminator, Self::Ecotop]
    }
}

impl fmt::Display for PlantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PlantKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "vampair" => Ok(Self::Vampair),
            "therminator" => Ok(Self::Therminator),
            "ecotop" => Ok(Self::Ecotop),
            _ => Err(anyhow::anyhow!(
                "Unknown plant variant: '{}'. Supported variants: {}",
                s,
                Self::all()
                    .iter()
                    .map(|k| k.to_config_value())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Firmware API versions of the device register interface
///
/// Ordering follows release order, so `>=` comparisons express
/// "register available since this firmware".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApiVersion {
    #[serde(rename = "21.140")]
    V21_140,
    #[serde(rename = "22.090")]
    V22_090,
    #[serde(rename = "23.010")]
    V23_010,
    #[serde(rename = "23.020")]
    V23_020,
}

impl ApiVersion {
    /// The latest supported firmware API version
    pub fn latest() -> Self {
        Self::V23_020
    }

    /// Get config string value ("21.140" style)
    pub fn to_config_value(&self) -> &'static str {
        match self {
            Self::V21_140 => "21.140",
            Self::V22_090 => "22.090",
            Self::V23_010 => "23.010",
            Self::V23_020 => "23.020",
        }
    }

    /// List all supported API versions, oldest first
    pub fn all() -> &'static [ApiVersion] {
        &[Self::V21_140, Self::V22_090, Self::V23_010, Self::V23_020]
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_config_value())
    }
}

impl FromStr for ApiVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "21.140" => Ok(Self::V21_140),
            "22.090" => Ok(Self::V22_090),
            "23.010" => Ok(Self::V23_010),
            "23.020" => Ok(Self::V23_020),
            _ => Err(anyhow::anyhow!(
                "Unknown API version: '{}'. Supported versions: {}",
                s,
                Self::all()
                    .iter()
                    .map(|v| v.to_config_value())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}
