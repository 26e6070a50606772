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

//! Sensor platform description tables.

use thermion_core::describe::{
    DeviceClass, EntityDescription, EntityDomain, EntityTemplate, StateClass, create_description,
};
use thermion_core::Subsystem;
use thermion_types::{ApiVersion, ComponentsConfig};

const CELSIUS: &str = "°C";
const PERCENT: &str = "%";
const WATT: &str = "W";
const KILO_WATT: &str = "kW";
const WATT_HOUR: &str = "Wh";
const KILO_WATT_HOUR: &str = "kWh";
const KILOGRAM: &str = "kg";
const LITER_PER_HOUR: &str = "l/h";
const RPM: &str = "rpm";

const fn sensor(key: &'static str) -> EntityTemplate {
    EntityTemplate::new(key, EntityDomain::Sensor)
}

const fn temperature(key: &'static str, icon: &'static str) -> EntityTemplate {
    EntityTemplate {
        unit: Some(CELSIUS),
        icon: Some(icon),
        device_class: Some(DeviceClass::Temperature),
        state_class: Some(StateClass::Measurement),
        ..sensor(key)
    }
}

const fn energy(key: &'static str, unit: &'static str, icon: &'static str) -> EntityTemplate {
    EntityTemplate {
        unit: Some(unit),
        icon: Some(icon),
        device_class: Some(DeviceClass::Energy),
        state_class: Some(StateClass::TotalIncreasing),
        ..sensor(key)
    }
}

const fn power(key: &'static str, unit: &'static str, icon: &'static str) -> EntityTemplate {
    EntityTemplate {
        unit: Some(unit),
        icon: Some(icon),
        device_class: Some(DeviceClass::Power),
        state_class: Some(StateClass::Measurement),
        ..sensor(key)
    }
}

const fn state_enum(key: &'static str, icon: &'static str) -> EntityTemplate {
    EntityTemplate {
        icon: Some(icon),
        device_class: Some(DeviceClass::Enum),
        ..sensor(key)
    }
}

const HEATING_CIRCUIT_SENSOR_TYPES: &[EntityTemplate] = &[
    temperature("supply_temperature", "mdi:thermometer"),
    temperature("room_temperature", "mdi:home-thermometer-outline"),
    EntityTemplate {
        unit: Some(PERCENT),
        icon: Some("mdi:water-percent"),
        device_class: Some(DeviceClass::Humidity),
        state_class: Some(StateClass::Measurement),
        ..sensor("humidity")
    },
    EntityTemplate {
        unit: Some(PERCENT),
        icon: Some("mdi:valve"),
        ..sensor("mixer_valve")
    },
    state_enum("state", "mdi:radiator"),
];

const BUFFER_SENSOR_TYPES: &[EntityTemplate] = &[
    temperature("top_temperature", "mdi:thermometer"),
    temperature("bottom_temperature", "mdi:thermometer-low"),
    state_enum("state", "mdi:database"),
    state_enum("mode", "mdi:format-list-bulleted"),
];

const BOILER_SENSOR_TYPES: &[EntityTemplate] = &[
    temperature("temperature", "mdi:thermometer-high"),
    state_enum("state", "mdi:water-boiler"),
    state_enum("mode", "mdi:format-list-bulleted"),
    state_enum("single_charge", "mdi:pump"),
    state_enum("circulation", "mdi:reload"),
];

const HEAT_PUMP_SENSOR_TYPES: &[EntityTemplate] = &[
    temperature("supply_temperature", "mdi:thermometer-chevron-up"),
    temperature("return_temperature", "mdi:thermometer-chevron-down"),
    EntityTemplate {
        unit: Some(LITER_PER_HOUR),
        icon: Some("mdi:speedometer"),
        state_class: Some(StateClass::Measurement),
        ..sensor("flow_rate")
    },
    EntityTemplate {
        unit: Some(RPM),
        icon: Some("mdi:gauge"),
        state_class: Some(StateClass::Measurement),
        ..sensor("compressor_speed")
    },
    energy("thermal_energy_total", KILO_WATT_HOUR, "mdi:meter-gas"),
    energy(
        "thermal_energy_drinking_water",
        KILO_WATT_HOUR,
        "mdi:meter-gas",
    ),
    energy("thermal_energy_heating", KILO_WATT_HOUR, "mdi:meter-gas"),
    energy(
        "electrical_energy_total",
        KILO_WATT_HOUR,
        "mdi:meter-electric",
    ),
    energy(
        "electrical_energy_drinking_water",
        KILO_WATT_HOUR,
        "mdi:meter-electric",
    ),
    energy(
        "electrical_energy_heating",
        KILO_WATT_HOUR,
        "mdi:meter-electric",
    ),
    power("electrical_power", WATT, "mdi:lightning-bolt"),
    EntityTemplate {
        since: Some(ApiVersion::V22_090),
        ..power("thermal_power_cooling", WATT, "mdi:snowflake")
    },
    power("thermal_power_heating", WATT, "mdi:fire"),
    EntityTemplate {
        since: Some(ApiVersion::V22_090),
        ..energy("thermal_energy_cooling", KILO_WATT_HOUR, "mdi:meter-gas")
    },
    EntityTemplate {
        since: Some(ApiVersion::V22_090),
        ..energy(
            "electrical_energy_cooling",
            KILO_WATT_HOUR,
            "mdi:meter-electric",
        )
    },
    state_enum("vampair_state", "mdi:heat-pump"),
    EntityTemplate {
        icon: Some("mdi:poll"),
        state_class: Some(StateClass::Measurement),
        since: Some(ApiVersion::V22_090),
        ..sensor("cop_cooling")
    },
    EntityTemplate {
        icon: Some("mdi:poll"),
        state_class: Some(StateClass::Measurement),
        ..sensor("cop_heating")
    },
    EntityTemplate {
        icon: Some("mdi:poll"),
        state_class: Some(StateClass::Measurement),
        ..sensor("performance_overall")
    },
    EntityTemplate {
        icon: Some("mdi:poll"),
        state_class: Some(StateClass::Measurement),
        ..sensor("performance_overall_heating")
    },
    EntityTemplate {
        icon: Some("mdi:poll"),
        state_class: Some(StateClass::Measurement),
        ..sensor("performance_overall_drinking_water")
    },
];

const PHOTOVOLTAIC_SENSOR_TYPES: &[EntityTemplate] = &[
    power("power", WATT, "mdi:solar-power"),
    power("house_consumption", WATT, "mdi:home-lightning-bolt-outline"),
    power("heatpump_consumption", WATT, "mdi:heat-pump-outline"),
    power("grid_import", WATT, "mdi:home-import-outline"),
    power("grid_export", WATT, "mdi:home-export-outline"),
];

const BIOMASS_BOILER_SENSOR_TYPES: &[EntityTemplate] = &[
    temperature("temperature", "mdi:thermometer"),
    state_enum("status", "mdi:fire-circle"),
    state_enum("message_number", "mdi:message-text-outline"),
    EntityTemplate {
        unit: Some(PERCENT),
        icon: Some("mdi:broom"),
        ..sensor("cleaning")
    },
    EntityTemplate {
        unit: Some(PERCENT),
        icon: Some("mdi:trash-can-outline"),
        ..sensor("ash_container")
    },
    temperature("outdoor_temperature", "mdi:thermometer"),
    state_enum("boiler_operating_mode", "mdi:format-list-bulleted"),
    EntityTemplate {
        since: Some(ApiVersion::V23_010),
        ..temperature("octoplus_buffer_temperature_bottom", "mdi:thermometer-low")
    },
    EntityTemplate {
        since: Some(ApiVersion::V23_010),
        ..temperature("octoplus_buffer_temperature_top", "mdi:thermometer")
    },
    EntityTemplate {
        since: Some(ApiVersion::V23_010),
        ..state_enum("log_wood", "mdi:format-list-bulleted")
    },
    EntityTemplate {
        unit: Some(KILOGRAM),
        icon: Some("mdi:gradient-vertical"),
        device_class: Some(DeviceClass::Weight),
        state_class: Some(StateClass::Measurement),
        since: Some(ApiVersion::V23_010),
        ..sensor("pellet_usage_last_fill")
    },
    EntityTemplate {
        unit: Some(KILOGRAM),
        icon: Some("mdi:alpha-t-box"),
        device_class: Some(DeviceClass::Weight),
        state_class: Some(StateClass::Measurement),
        since: Some(ApiVersion::V23_010),
        ..sensor("pellet_usage_total")
    },
    energy("heat_energy_total", KILO_WATT_HOUR, "mdi:meter-gas"),
];

const SOLAR_SENSOR_TYPES: &[EntityTemplate] = &[
    temperature("collector_temperature_1", "mdi:thermometer"),
    temperature("collector_temperature_2", "mdi:thermometer"),
    temperature("collector_supply_temperature", "mdi:thermometer"),
    temperature("collector_return_temperature", "mdi:thermometer"),
    EntityTemplate {
        unit: Some(LITER_PER_HOUR),
        icon: Some("mdi:speedometer"),
        state_class: Some(StateClass::Measurement),
        ..sensor("flow_heat_meter")
    },
    power("current_power", KILO_WATT, "mdi:lightning-bolt"),
    energy("current_yield_heat_meter", WATT_HOUR, "mdi:meter-electric"),
    energy("today_yield", WATT_HOUR, "mdi:meter-electric"),
    temperature("buffer_sensor_1", "mdi:thermometer"),
    temperature("buffer_sensor_2", "mdi:thermometer"),
    temperature("buffer_sensor_3", "mdi:thermometer"),
    state_enum("state", "mdi:solar-power-variant"),
];

const FRESH_WATER_MODULE_SENSOR_TYPES: &[EntityTemplate] = &[EntityTemplate {
    since: Some(ApiVersion::V23_020),
    ..state_enum("state", "mdi:faucet")
}];

pub(crate) fn descriptions(components: &ComponentsConfig) -> Vec<EntityDescription> {
    let mut entities = Vec::new();

    for i in 1..=components.heating_circuits {
        for template in HEATING_CIRCUIT_SENSOR_TYPES {
            entities.push(create_description(
                Subsystem::HeatingCircuit,
                Some(i),
                template,
            ));
        }
    }

    for i in 1..=components.buffers {
        for template in BUFFER_SENSOR_TYPES {
            entities.push(create_description(Subsystem::Buffer, Some(i), template));
        }
    }

    for i in 1..=components.boilers {
        for template in BOILER_SENSOR_TYPES {
            entities.push(create_description(Subsystem::Boiler, Some(i), template));
        }
    }

    if components.heat_pump {
        for template in HEAT_PUMP_SENSOR_TYPES {
            entities.push(create_description(Subsystem::HeatPump, None, template));
        }
    }

    if components.biomass_boiler {
        for template in BIOMASS_BOILER_SENSOR_TYPES {
            entities.push(create_description(Subsystem::BiomassBoiler, None, template));
        }
    }

    if components.photovoltaic {
        for template in PHOTOVOLTAIC_SENSOR_TYPES {
            entities.push(create_description(Subsystem::Photovoltaic, None, template));
        }
    }

    if components.solar {
        for template in SOLAR_SENSOR_TYPES {
            entities.push(create_description(Subsystem::Solar, None, template));
        }
    }

    for i in 1..=components.fresh_water_modules {
        for template in FRESH_WATER_MODULE_SENSOR_TYPES {
            entities.push(create_description(
                Subsystem::FreshWaterModule,
                Some(i),
                template,
            ));
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_drive_instances() {
        let components = ComponentsConfig {
            heating_circuits: 3,
            buffers: 0,
            boilers: 0,
            fresh_water_modules: 0,
            heat_pump: false,
            biomass_boiler: false,
            photovoltaic: false,
            solar: false,
        };
        let entities = descriptions(&components);
        assert_eq!(entities.len(), 3 * HEATING_CIRCUIT_SENSOR_TYPES.len());
        assert!(entities.iter().any(|e| e.key == "hc3_state"));
    }

    #[test]
    fn test_singleton_subsystems_have_no_index() {
        let components = ComponentsConfig {
            heating_circuits: 0,
            buffers: 0,
            boilers: 0,
            fresh_water_modules: 0,
            heat_pump: true,
            biomass_boiler: false,
            photovoltaic: false,
            solar: false,
        };
        let entities = descriptions(&components);
        assert!(entities.iter().all(|e| e.component.index.is_none()));
        assert!(entities.iter().any(|e| e.key == "hp_cop_heating"));
        assert!(
            entities
                .iter()
                .any(|e| e.name == "Heatpump thermal energy total")
        );
    }
}
