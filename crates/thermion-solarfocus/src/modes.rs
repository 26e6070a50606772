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

use serde::{Deserialize, Serialize};

/// Heating circuit operating mode (holding register `mode_holding`)
///
/// The enum discriminants match the numeric values used by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum HeatingCircuitMode {
    #[serde(rename = "Always Comfort")]
    AlwaysComfort = 0,

    #[serde(rename = "Always Lowering")]
    AlwaysLowering = 1,

    #[serde(rename = "Automatic")]
    Automatic = 2,

    #[serde(rename = "Off")]
    Off = 3,
}

impl HeatingCircuitMode {
    /// Try to create from i32 discriminant
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::AlwaysComfort),
            1 => Some(Self::AlwaysLowering),
            2 => Some(Self::Automatic),
            3 => Some(Self::Off),
            _ => None,
        }
    }

    /// Convert to i32 discriminant
    pub fn to_i32(self) -> i32 {
        self as i32
    }
}

/// Heating circuit cooling flag (holding register `cooling`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum HeatingCircuitCooling {
    #[serde(rename = "Heating")]
    Heating = 0,

    #[serde(rename = "Cooling")]
    Cooling = 1,
}

impl HeatingCircuitCooling {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Heating),
            1 => Some(Self::Cooling),
            _ => None,
        }
    }

    pub fn to_i32(self) -> i32 {
        self as i32
    }
}

/// Domestic hot water boiler mode (holding register `mode_holding`)
///
/// The display strings follow the device UI wording and are what the
/// water-heater entity shows as operation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum BoilerMode {
    #[serde(rename = "Immer Aus")]
    AlwaysOff = 0,

    #[serde(rename = "Immer An")]
    AlwaysOn = 1,

    #[serde(rename = "Montag - Sonntag")]
    MondayToSunday = 2,

    #[serde(rename = "Blockweise")]
    Blockwise = 3,

    #[serde(rename = "Tageweise")]
    Daywise = 4,
}

impl BoilerMode {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::AlwaysOff),
            1 => Some(Self::AlwaysOn),
            2 => Some(Self::MondayToSunday),
            3 => Some(Self::Blockwise),
            4 => Some(Self::Daywise),
            _ => None,
        }
    }

    pub fn to_i32(self) -> i32 {
        self as i32
    }

    /// Display string shown as the water-heater operation mode
    pub fn display(&self) -> &'static str {
        match self {
            Self::AlwaysOff => "Immer Aus",
            Self::AlwaysOn => "Immer An",
            Self::MondayToSunday => "Montag - Sonntag",
            Self::Blockwise => "Blockweise",
            Self::Daywise => "Tageweise",
        }
    }

    /// Parse a display string back to the mode
    pub fn from_display(display: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.display() == display)
    }

    /// All modes in device order
    pub fn all() -> &'static [BoilerMode] {
        &[
            Self::AlwaysOff,
            Self::AlwaysOn,
            Self::MondayToSunday,
            Self::Blockwise,
            Self::Daywise,
        ]
    }
}

/// Heat pump smart grid setting (holding register `smart_grid`)
///
/// The device only distinguishes "normal" (2) and "elevated" (4) operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum SmartGridMode {
    #[serde(rename = "Normal")]
    Normal = 2,

    #[serde(rename = "Elevated")]
    Elevated = 4,
}

impl SmartGridMode {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            2 => Some(Self::Normal),
            4 => Some(Self::Elevated),
            _ => None,
        }
    }

    pub fn to_i32(self) -> i32 {
        self as i32
    }
}
