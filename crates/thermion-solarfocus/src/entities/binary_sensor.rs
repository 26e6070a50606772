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

//! Binary sensor platform description tables.

use thermion_core::Subsystem;
use thermion_core::describe::{
    DeviceClass, EntityDescription, EntityDomain, EntityTemplate, create_description,
};
use thermion_types::ComponentsConfig;

const fn binary(key: &'static str) -> EntityTemplate {
    EntityTemplate::new(key, EntityDomain::BinarySensor)
}

const HEATING_CIRCUIT_BINARY_SENSOR_TYPES: &[EntityTemplate] = &[
    EntityTemplate {
        device_class: Some(DeviceClass::Problem),
        on_state: Some(0),
        ..binary("limit_thermostat")
    },
    EntityTemplate {
        device_class: Some(DeviceClass::Running),
        on_state: Some(1),
        ..binary("circulator_pump")
    },
];

const BUFFER_BINARY_SENSOR_TYPES: &[EntityTemplate] = &[EntityTemplate {
    device_class: Some(DeviceClass::Running),
    on_state: Some(1),
    ..binary("pump")
}];

const HEAT_PUMP_BINARY_SENSOR_TYPES: &[EntityTemplate] = &[
    EntityTemplate {
        device_class: Some(DeviceClass::Lock),
        on_state: Some(0),
        ..binary("evu_lock_active")
    },
    EntityTemplate {
        icon: Some("mdi:snowflake-melt"),
        on_state: Some(1),
        ..binary("defrost_active")
    },
    EntityTemplate {
        device_class: Some(DeviceClass::Running),
        on_state: Some(1),
        ..binary("boiler_charge")
    },
];

const BIOMASS_BOILER_BINARY_SENSOR_TYPES: &[EntityTemplate] = &[EntityTemplate {
    device_class: Some(DeviceClass::Door),
    on_state: Some(1),
    ..binary("door_contact")
}];

pub(crate) fn descriptions(components: &ComponentsConfig) -> Vec<EntityDescription> {
    let mut entities = Vec::new();

    for i in 1..=components.heating_circuits {
        for template in HEATING_CIRCUIT_BINARY_SENSOR_TYPES {
            entities.push(create_description(
                Subsystem::HeatingCircuit,
                Some(i),
                template,
            ));
        }
    }

    for i in 1..=components.buffers {
        for template in BUFFER_BINARY_SENSOR_TYPES {
            entities.push(create_description(Subsystem::Buffer, Some(i), template));
        }
    }

    if components.heat_pump {
        for template in HEAT_PUMP_BINARY_SENSOR_TYPES {
            entities.push(create_description(Subsystem::HeatPump, None, template));
        }
    }

    if components.biomass_boiler {
        for template in BIOMASS_BOILER_BINARY_SENSOR_TYPES {
            entities.push(create_description(Subsystem::BiomassBoiler, None, template));
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_state_always_present() {
        let components = ComponentsConfig {
            heating_circuits: 1,
            buffers: 1,
            boilers: 0,
            fresh_water_modules: 0,
            heat_pump: true,
            biomass_boiler: true,
            photovoltaic: false,
            solar: false,
        };
        let entities = descriptions(&components);
        assert!(!entities.is_empty());
        assert!(entities.iter().all(|e| e.template.on_state.is_some()));
    }

    #[test]
    fn test_inverted_on_state_for_problem_sensors() {
        let components = ComponentsConfig {
            heating_circuits: 1,
            buffers: 0,
            boilers: 0,
            fresh_water_modules: 0,
            heat_pump: false,
            biomass_boiler: false,
            photovoltaic: false,
            solar: false,
        };
        let entities = descriptions(&components);
        let thermostat = entities
            .iter()
            .find(|e| e.key == "hc1_limit_thermostat")
            .unwrap();
        assert_eq!(thermostat.template.on_state, Some(0));
    }
}
