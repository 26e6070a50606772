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

use crate::traits::{ComponentId, ComponentValues, Subsystem};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// The latest polled state of the whole plant
///
/// Entities read from the snapshot only; the coordinator replaces it
/// wholesale after every poll cycle.
#[derive(Debug, Clone)]
pub struct PlantSnapshot {
    components: HashMap<Subsystem, Vec<ComponentValues>>,
    pub taken_at: DateTime<Utc>,
    pub online: bool,
}

impl PlantSnapshot {
    pub fn empty() -> Self {
        Self {
            components: HashMap::new(),
            taken_at: Utc::now(),
            online: false,
        }
    }

    /// Replace all instances of one subsystem
    pub fn insert(&mut self, subsystem: Subsystem, values: Vec<ComponentValues>) {
        self.components.insert(subsystem, values);
    }

    /// All instances of one subsystem, empty when never polled
    pub fn components(&self, subsystem: Subsystem) -> &[ComponentValues] {
        self.components
            .get(&subsystem)
            .map_or(&[], Vec::as_slice)
    }

    /// Look up a single scaled value by component address and register name
    pub fn value(&self, component: &ComponentId, item: &str) -> Option<f64> {
        self.components
            .get(&component.subsystem)?
            .get(component.slot())?
            .get(item)
    }

    /// Number of component instances present across all subsystems
    pub fn component_count(&self) -> usize {
        self.components.values().map(Vec::len).sum()
    }
}

impl Default for PlantSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
