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

//! Switch platform description tables.

use thermion_core::Subsystem;
use thermion_core::describe::{
    DeviceClass, EntityDescription, EntityDomain, EntityTemplate, create_description,
};
use thermion_types::{ComponentsConfig, PlantKind};

const HEAT_PUMP_SWITCH_TYPES: &[EntityTemplate] = &[EntityTemplate {
    icon: Some("mdi:lock"),
    device_class: Some(DeviceClass::Switch),
    plants: Some(&[PlantKind::Vampair]),
    ..EntityTemplate::new("evu_lock", EntityDomain::Switch)
}];

pub(crate) fn descriptions(components: &ComponentsConfig) -> Vec<EntityDescription> {
    let mut entities = Vec::new();

    if components.heat_pump {
        for template in HEAT_PUMP_SWITCH_TYPES {
            entities.push(create_description(Subsystem::HeatPump, None, template));
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_only_with_heat_pump() {
        let mut components = ComponentsConfig {
            heating_circuits: 0,
            buffers: 0,
            boilers: 0,
            fresh_water_modules: 0,
            heat_pump: true,
            biomass_boiler: false,
            photovoltaic: false,
            solar: false,
        };
        assert_eq!(descriptions(&components).len(), 1);
        assert_eq!(descriptions(&components)[0].key, "hp_evu_lock");

        components.heat_pump = false;
        assert!(descriptions(&components).is_empty());
    }
}
