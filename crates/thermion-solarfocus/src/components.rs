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

//! Static register maps, one per plant subsystem.
//!
//! Every component instance owns a contiguous input block (read-only process
//! values) and, where the device accepts commands, a holding block. Indexed
//! subsystems repeat their blocks at a fixed stride per instance.

use crate::registers::RegisterSpec;
use thermion_core::{ComponentValues, Subsystem};
use thermion_types::ApiVersion;

/// Register layout of one subsystem
#[derive(Debug, Clone, Copy)]
pub struct ComponentMap {
    pub subsystem: Subsystem,
    pub input_base: u16,
    pub input_stride: u16,
    /// Words to read per instance input block
    pub input_count: u16,
    pub holding_base: u16,
    pub holding_stride: u16,
    /// Words to read per instance holding block (0 = nothing writable)
    pub holding_count: u16,
    pub inputs: &'static [RegisterSpec],
    pub holdings: &'static [RegisterSpec],
}

impl ComponentMap {
    /// Base address of the input block for a zero-based instance slot
    pub fn input_address(&self, slot: u8) -> u16 {
        self.input_base + u16::from(slot) * self.input_stride
    }

    /// Base address of the holding block for a zero-based instance slot
    pub fn holding_address(&self, slot: u8) -> u16 {
        self.holding_base + u16::from(slot) * self.holding_stride
    }

    /// Resolve a writable register by name
    pub fn holding(&self, name: &str) -> Option<&'static RegisterSpec> {
        self.holdings.iter().find(|spec| spec.name == name)
    }

    /// Decode the raw input and holding blocks of one instance into scaled
    /// values, skipping registers the firmware version does not expose
    pub fn decode(
        &self,
        inputs: &[u16],
        holdings: &[u16],
        version: ApiVersion,
    ) -> ComponentValues {
        let mut values = ComponentValues::new();
        for spec in self.inputs {
            if !spec.available_on(version) {
                continue;
            }
            if let Some(raw) = spec.decode(inputs) {
                values.insert(spec.name, spec.scaled(raw));
            }
        }
        for spec in self.holdings {
            if !spec.available_on(version) {
                continue;
            }
            if let Some(raw) = spec.decode(holdings) {
                values.insert(spec.name, spec.scaled(raw));
            }
        }
        values
    }
}

const HEATING_CIRCUIT: ComponentMap = ComponentMap {
    subsystem: Subsystem::HeatingCircuit,
    input_base: 1100,
    input_stride: 50,
    input_count: 7,
    holding_base: 32600,
    holding_stride: 50,
    holding_count: 4,
    inputs: &[
        RegisterSpec::s16("supply_temperature", 0).factor(0.1),
        RegisterSpec::s16("room_temperature", 1).factor(0.1),
        RegisterSpec::s16("humidity", 2).factor(0.1),
        RegisterSpec::u16("limit_thermostat", 3),
        RegisterSpec::u16("circulator_pump", 4),
        RegisterSpec::u16("mixer_valve", 5),
        RegisterSpec::u16("state", 6),
    ],
    holdings: &[
        RegisterSpec::s16("target_supply_temperature", 0).factor(0.1),
        RegisterSpec::u16("cooling", 1),
        RegisterSpec::u16("mode_holding", 2),
        RegisterSpec::s16("target_room_temperature", 3).factor(0.1),
    ],
};

const BUFFER: ComponentMap = ComponentMap {
    subsystem: Subsystem::Buffer,
    input_base: 1900,
    input_stride: 10,
    input_count: 5,
    holding_base: 0,
    holding_stride: 0,
    holding_count: 0,
    inputs: &[
        RegisterSpec::s16("top_temperature", 0).factor(0.1),
        RegisterSpec::s16("bottom_temperature", 1).factor(0.1),
        RegisterSpec::u16("pump", 2),
        RegisterSpec::u16("state", 3),
        RegisterSpec::u16("mode", 4),
    ],
    holdings: &[],
};

const BOILER: ComponentMap = ComponentMap {
    subsystem: Subsystem::Boiler,
    input_base: 500,
    input_stride: 50,
    input_count: 5,
    holding_base: 32000,
    holding_stride: 50,
    holding_count: 4,
    inputs: &[
        RegisterSpec::s16("temperature", 0).factor(0.1),
        RegisterSpec::u16("state", 1),
        RegisterSpec::u16("mode", 2),
        RegisterSpec::u16("single_charge", 3),
        RegisterSpec::s16("circulation", 4),
    ],
    holdings: &[
        RegisterSpec::s16("target_temperature", 0).factor(0.1),
        RegisterSpec::u16("mode_holding", 1),
        RegisterSpec::u16("enable_single_charge", 2),
        RegisterSpec::u16("enable_circulation", 3),
    ],
};

const HEAT_PUMP: ComponentMap = ComponentMap {
    subsystem: Subsystem::HeatPump,
    input_base: 2300,
    input_stride: 0,
    input_count: 27,
    holding_base: 33400,
    holding_stride: 0,
    holding_count: 2,
    inputs: &[
        RegisterSpec::s16("supply_temperature", 0).factor(0.1),
        RegisterSpec::s16("return_temperature", 1).factor(0.1),
        RegisterSpec::u16("flow_rate", 2),
        RegisterSpec::u16("compressor_speed", 3),
        RegisterSpec::u16("evu_lock_active", 4),
        RegisterSpec::u16("defrost_active", 5),
        RegisterSpec::u16("boiler_charge", 6),
        RegisterSpec::u32("thermal_energy_total", 7).factor(0.001),
        RegisterSpec::u32("thermal_energy_drinking_water", 9).factor(0.001),
        RegisterSpec::u32("thermal_energy_heating", 11).factor(0.001),
        RegisterSpec::u32("electrical_energy_total", 13).factor(0.001),
        RegisterSpec::u32("electrical_energy_drinking_water", 15).factor(0.001),
        RegisterSpec::u32("electrical_energy_heating", 17).factor(0.001),
        RegisterSpec::u16("electrical_power", 19),
        RegisterSpec::u16("thermal_power_heating", 20),
        RegisterSpec::u16("thermal_power_cooling", 21).since(ApiVersion::V22_090),
        RegisterSpec::u32("thermal_energy_cooling", 22)
            .factor(0.001)
            .since(ApiVersion::V22_090),
        RegisterSpec::u32("electrical_energy_cooling", 24)
            .factor(0.001)
            .since(ApiVersion::V22_090),
        RegisterSpec::u16("vampair_state", 26),
    ],
    holdings: &[
        RegisterSpec::u16("smart_grid", 0),
        RegisterSpec::u16("evu_lock", 1),
    ],
};

const BIOMASS_BOILER: ComponentMap = ComponentMap {
    subsystem: Subsystem::BiomassBoiler,
    input_base: 2400,
    input_stride: 0,
    input_count: 17,
    holding_base: 0,
    holding_stride: 0,
    holding_count: 0,
    inputs: &[
        RegisterSpec::s16("temperature", 0).factor(0.1),
        RegisterSpec::u16("status", 1),
        RegisterSpec::u16("message_number", 2),
        RegisterSpec::u16("cleaning", 3),
        RegisterSpec::u16("ash_container", 4),
        RegisterSpec::s16("outdoor_temperature", 5).factor(0.1),
        RegisterSpec::u16("boiler_operating_mode", 6),
        RegisterSpec::s16("octoplus_buffer_temperature_bottom", 7)
            .factor(0.1)
            .since(ApiVersion::V23_010),
        RegisterSpec::s16("octoplus_buffer_temperature_top", 8)
            .factor(0.1)
            .since(ApiVersion::V23_010),
        RegisterSpec::u16("log_wood", 9).since(ApiVersion::V23_010),
        RegisterSpec::u32("pellet_usage_last_fill", 10)
            .factor(0.1)
            .since(ApiVersion::V23_010),
        RegisterSpec::u32("pellet_usage_total", 12)
            .factor(0.1)
            .since(ApiVersion::V23_010),
        RegisterSpec::u32("heat_energy_total", 14).factor(0.001),
        RegisterSpec::u16("door_contact", 16),
    ],
    holdings: &[],
};

const PHOTOVOLTAIC: ComponentMap = ComponentMap {
    subsystem: Subsystem::Photovoltaic,
    input_base: 2500,
    input_stride: 0,
    input_count: 10,
    holding_base: 0,
    holding_stride: 0,
    holding_count: 0,
    inputs: &[
        RegisterSpec::u32("power", 0),
        RegisterSpec::u32("house_consumption", 2),
        RegisterSpec::u32("heatpump_consumption", 4),
        RegisterSpec::u32("grid_import", 6),
        RegisterSpec::u32("grid_export", 8),
    ],
    holdings: &[],
};

const SOLAR: ComponentMap = ComponentMap {
    subsystem: Subsystem::Solar,
    input_base: 2100,
    input_stride: 0,
    input_count: 14,
    holding_base: 0,
    holding_stride: 0,
    holding_count: 0,
    inputs: &[
        RegisterSpec::s16("collector_temperature_1", 0).factor(0.1),
        RegisterSpec::s16("collector_temperature_2", 1).factor(0.1),
        RegisterSpec::s16("collector_supply_temperature", 2).factor(0.1),
        RegisterSpec::s16("collector_return_temperature", 3).factor(0.1),
        RegisterSpec::u16("flow_heat_meter", 4),
        RegisterSpec::u16("current_power", 5).factor(0.001),
        RegisterSpec::u32("current_yield_heat_meter", 6),
        RegisterSpec::u32("today_yield", 8),
        RegisterSpec::s16("buffer_sensor_1", 10).factor(0.1),
        RegisterSpec::s16("buffer_sensor_2", 11).factor(0.1),
        RegisterSpec::s16("buffer_sensor_3", 12).factor(0.1),
        RegisterSpec::u16("state", 13),
    ],
    holdings: &[],
};

const FRESH_WATER_MODULE: ComponentMap = ComponentMap {
    subsystem: Subsystem::FreshWaterModule,
    input_base: 700,
    input_stride: 10,
    input_count: 1,
    holding_base: 0,
    holding_stride: 0,
    holding_count: 0,
    inputs: &[RegisterSpec::u16("state", 0)],
    holdings: &[],
};

/// Register map for a subsystem
pub fn component_map(subsystem: Subsystem) -> &'static ComponentMap {
    match subsystem {
        Subsystem::HeatingCircuit => &HEATING_CIRCUIT,
        Subsystem::Buffer => &BUFFER,
        Subsystem::Boiler => &BOILER,
        Subsystem::HeatPump => &HEAT_PUMP,
        Subsystem::BiomassBoiler => &BIOMASS_BOILER,
        Subsystem::Photovoltaic => &PHOTOVOLTAIC,
        Subsystem::Solar => &SOLAR,
        Subsystem::FreshWaterModule => &FRESH_WATER_MODULE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_lengths_cover_all_registers() {
        for subsystem in Subsystem::all() {
            let map = component_map(*subsystem);
            for spec in map.inputs {
                assert!(
                    spec.offset + spec.data.words() <= map.input_count,
                    "{subsystem}: input '{}' exceeds block length",
                    spec.name
                );
            }
            for spec in map.holdings {
                assert!(
                    spec.offset + spec.data.words() <= map.holding_count,
                    "{subsystem}: holding '{}' exceeds block length",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_register_names_unique_per_component() {
        for subsystem in Subsystem::all() {
            let map = component_map(*subsystem);
            let mut seen = std::collections::HashSet::new();
            for spec in map.inputs.iter().chain(map.holdings) {
                assert!(
                    seen.insert(spec.name),
                    "{subsystem}: duplicate register name '{}'",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_instance_addressing() {
        let map = component_map(Subsystem::HeatingCircuit);
        assert_eq!(map.input_address(0), 1100);
        assert_eq!(map.input_address(2), 1200);
        assert_eq!(map.holding_address(1), 32650);

        let singleton = component_map(Subsystem::HeatPump);
        assert_eq!(singleton.input_address(0), 2300);
    }

    #[test]
    fn test_decode_heating_circuit_block() {
        let map = component_map(Subsystem::HeatingCircuit);
        // 31.5 °C supply, 21.0 °C room, 45.0 % humidity, thermostat open,
        // pump running, mixer 38 %, state 12
        let inputs = [315, 210, 450, 1, 1, 38, 12];
        let holdings = [305, 0, 2, 220];
        let values = map.decode(&inputs, &holdings, ApiVersion::V23_020);

        assert_eq!(values.get("supply_temperature"), Some(31.5));
        assert_eq!(values.get("room_temperature"), Some(21.0));
        assert_eq!(values.get("humidity"), Some(45.0));
        assert_eq!(values.get("mixer_valve"), Some(38.0));
        assert_eq!(values.get("state"), Some(12.0));
        assert_eq!(values.get("target_supply_temperature"), Some(30.5));
        assert_eq!(values.get("mode_holding"), Some(2.0));
    }

    #[test]
    fn test_decode_skips_version_gated_registers() {
        let map = component_map(Subsystem::BiomassBoiler);
        let inputs = [650, 3, 0, 80, 20, -52i16 as u16, 1, 480, 550, 1, 0, 120, 0, 9000, 0, 37000, 1];

        let old = map.decode(&inputs, &[], ApiVersion::V21_140);
        assert_eq!(old.get("temperature"), Some(65.0));
        assert_eq!(old.get("outdoor_temperature"), Some(-5.2));
        assert_eq!(old.get("log_wood"), None);
        assert_eq!(old.get("pellet_usage_total"), None);

        let new = map.decode(&inputs, &[], ApiVersion::V23_010);
        assert_eq!(new.get("log_wood"), Some(1.0));
        assert_eq!(new.get("pellet_usage_last_fill"), Some(12.0));
        assert_eq!(new.get("pellet_usage_total"), Some(900.0));
        assert_eq!(new.get("heat_energy_total"), Some(37.0));
    }

    #[test]
    fn test_holding_lookup() {
        let map = component_map(Subsystem::Boiler);
        assert!(map.holding("target_temperature").is_some());
        assert!(map.holding("temperature").is_none());

        let buffer = component_map(Subsystem::Buffer);
        assert!(buffer.holding("state").is_none());
    }
}
