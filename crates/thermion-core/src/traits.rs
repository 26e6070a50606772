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
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Subsystems of a Solarfocus plant
///
/// Heating circuits, buffers, boilers and fresh water modules are
/// per-instance subsystems; the rest exist at most once per plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    HeatingCircuit,
    Buffer,
    Boiler,
    HeatPump,
    BiomassBoiler,
    Photovoltaic,
    Solar,
    FreshWaterModule,
}

impl Subsystem {
    /// Short entity key prefix ("hc1_supply_temperature" style)
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::HeatingCircuit => "hc",
            Self::Buffer => "bu",
            Self::Boiler => "bo",
            Self::HeatPump => "hp",
            Self::BiomassBoiler => "pb",
            Self::Photovoltaic => "pv",
            Self::Solar => "so",
            Self::FreshWaterModule => "fw",
        }
    }

    /// Human-readable subsystem title used for entity names
    pub fn title(&self) -> &'static str {
        match self {
            Self::HeatingCircuit => "Heating Circuit",
            Self::Buffer => "Buffer",
            Self::Boiler => "Boiler",
            Self::HeatPump => "Heatpump",
            Self::BiomassBoiler => "Biomass Boiler",
            Self::Photovoltaic => "Photovoltaic",
            Self::Solar => "Solar",
            Self::FreshWaterModule => "Fresh Water Module",
        }
    }

    /// Whether the subsystem supports multiple numbered instances
    pub fn is_indexed(&self) -> bool {
        matches!(
            self,
            Self::HeatingCircuit | Self::Buffer | Self::Boiler | Self::FreshWaterModule
        )
    }

    /// List all subsystems
    pub fn all() -> &'static [Subsystem] {
        &[
            Self::HeatingCircuit,
            Self::Buffer,
            Self::Boiler,
            Self::HeatPump,
            Self::BiomassBoiler,
            Self::Photovoltaic,
            Self::Solar,
            Self::FreshWaterModule,
        ]
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Address of one component instance within the plant
///
/// Indexed subsystems carry a 1-based instance number, singleton
/// subsystems carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId {
    pub subsystem: Subsystem,
    pub index: Option<u8>,
}

impl ComponentId {
    /// Address the nth instance of an indexed subsystem (1-based)
    pub fn indexed(subsystem: Subsystem, index: u8) -> Self {
        Self {
            subsystem,
            index: Some(index),
        }
    }

    /// Address a singleton subsystem
    pub fn singleton(subsystem: Subsystem) -> Self {
        Self {
            subsystem,
            index: None,
        }
    }

    /// Zero-based slot of this instance within the subsystem's block list
    pub fn slot(&self) -> usize {
        self.index.map_or(0, |i| i.saturating_sub(1) as usize)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}{}", self.subsystem.prefix(), i),
            None => write!(f, "{}", self.subsystem.prefix()),
        }
    }
}

/// Scaled values of one component instance, keyed by register name
#[derive(Debug, Clone, Default)]
pub struct ComponentValues {
    values: HashMap<&'static str, f64>,
}

impl ComponentValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: f64) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

/// A single value write targeting one field of one component instance
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub component: ComponentId,
    pub item: String,
    pub value: f64,
}

impl WriteRequest {
    pub fn new(component: ComponentId, item: impl Into<String>, value: f64) -> Self {
        Self {
            component,
            item: item.into(),
            value,
        }
    }
}

/// Generic data source for reading plant state and writing commands
/// Entity and coordinator code uses this trait, never the field-bus details
#[async_trait]
pub trait PlantDataSource: Send + Sync {
    /// Read the current values of all instances of one subsystem
    async fn read_components(
        &self,
        subsystem: Subsystem,
        count: u8,
    ) -> Result<Vec<ComponentValues>>;

    /// Write a single value to the device
    async fn write(&self, request: &WriteRequest) -> Result<()>;

    /// Check if the device is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get data source name for logging
    fn name(&self) -> &str;
}
