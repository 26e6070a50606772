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

//! Number platform description tables (writable setpoints).

use thermion_core::Subsystem;
use thermion_core::describe::{
    DeviceClass, EntityCategory, EntityDescription, EntityDomain, EntityTemplate,
    create_description,
};
use thermion_types::ComponentsConfig;

const HEATING_CIRCUIT_NUMBER_TYPES: &[EntityTemplate] = &[EntityTemplate {
    unit: Some("°C"),
    icon: Some("mdi:thermostat"),
    device_class: Some(DeviceClass::Temperature),
    entity_category: Some(EntityCategory::Config),
    min_value: Some(0.0),
    max_value: Some(35.0),
    step: Some(0.5),
    ..EntityTemplate::new("target_supply_temperature", EntityDomain::Number)
}];

const BOILER_NUMBER_TYPES: &[EntityTemplate] = &[EntityTemplate {
    unit: Some("°C"),
    icon: Some("mdi:thermostat"),
    device_class: Some(DeviceClass::Temperature),
    entity_category: Some(EntityCategory::Config),
    min_value: Some(20.0),
    max_value: Some(80.0),
    step: Some(1.0),
    ..EntityTemplate::new("target_temperature", EntityDomain::Number)
}];

pub(crate) fn descriptions(components: &ComponentsConfig) -> Vec<EntityDescription> {
    let mut entities = Vec::new();

    for i in 1..=components.heating_circuits {
        for template in HEATING_CIRCUIT_NUMBER_TYPES {
            entities.push(create_description(
                Subsystem::HeatingCircuit,
                Some(i),
                template,
            ));
        }
    }

    for i in 1..=components.boilers {
        for template in BOILER_NUMBER_TYPES {
            entities.push(create_description(Subsystem::Boiler, Some(i), template));
        }
    }

    entities
}
