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

//! Select platform description tables (writable mode registers).
//!
//! Options are the raw register values; the climate and water-heater
//! platforms expose the friendlier mappings on top of the same registers.

use thermion_core::Subsystem;
use thermion_core::describe::{
    EntityDescription, EntityDomain, EntityTemplate, create_description,
};
use thermion_types::{ComponentsConfig, PlantKind};

const HEATING_CIRCUIT_SELECT_TYPES: &[EntityTemplate] = &[
    EntityTemplate {
        icon: Some("mdi:snowflake"),
        options: Some(&["0", "1"]),
        ..EntityTemplate::new("cooling", EntityDomain::Select)
    },
    EntityTemplate {
        icon: Some("mdi:radiator"),
        options: Some(&["0", "1", "2", "3"]),
        ..EntityTemplate::new("mode_holding", EntityDomain::Select)
    },
];

const HEAT_PUMP_SELECT_TYPES: &[EntityTemplate] = &[EntityTemplate {
    icon: Some("mdi:leaf"),
    options: Some(&["2", "4"]),
    plants: Some(&[PlantKind::Vampair]),
    ..EntityTemplate::new("smart_grid", EntityDomain::Select)
}];

pub(crate) fn descriptions(components: &ComponentsConfig) -> Vec<EntityDescription> {
    let mut entities = Vec::new();

    for i in 1..=components.heating_circuits {
        for template in HEATING_CIRCUIT_SELECT_TYPES {
            entities.push(create_description(
                Subsystem::HeatingCircuit,
                Some(i),
                template,
            ));
        }
    }

    if components.heat_pump {
        for template in HEAT_PUMP_SELECT_TYPES {
            entities.push(create_description(Subsystem::HeatPump, None, template));
        }
    }

    entities
}
