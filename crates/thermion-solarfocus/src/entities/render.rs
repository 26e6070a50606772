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

//! Rendering: turn entity descriptions plus the latest snapshot into the
//! `(entity_id, state, attributes)` triples pushed to the host platform.

use super::{climate, water_heater};
use serde_json::{Map, Value, json};
use thermion_core::describe::{EntityDescription, EntityDomain};
use thermion_core::{
    PlantSnapshot, RenderedEntity, STATE_UNAVAILABLE, STATE_UNKNOWN, entity_id, format_state,
};

/// Render every entity of an installation against the latest snapshot.
///
/// When the last poll cycle failed every entity reports `unavailable`,
/// mirroring the availability rule of the polling coordinator.
pub fn render_all(
    installation: &str,
    descriptions: &[EntityDescription],
    snapshot: &PlantSnapshot,
) -> Vec<RenderedEntity> {
    descriptions
        .iter()
        .map(|description| render_entity(installation, description, snapshot))
        .collect()
}

/// Render a single entity against the latest snapshot
pub fn render_entity(
    installation: &str,
    description: &EntityDescription,
    snapshot: &PlantSnapshot,
) -> RenderedEntity {
    let mut attributes = base_attributes(description);

    let state = if snapshot.online {
        state_for(description, snapshot, &mut attributes)
    } else {
        STATE_UNAVAILABLE.to_owned()
    };

    RenderedEntity {
        entity_id: entity_id(installation, description),
        state,
        attributes: Value::Object(attributes),
    }
}

fn base_attributes(description: &EntityDescription) -> Map<String, Value> {
    let template = &description.template;
    let mut attributes = Map::new();
    attributes.insert("friendly_name".to_owned(), json!(description.name));
    if let Some(unit) = template.unit {
        attributes.insert("unit_of_measurement".to_owned(), json!(unit));
    }
    if let Some(icon) = template.icon {
        attributes.insert("icon".to_owned(), json!(icon));
    }
    if let Some(device_class) = template.device_class {
        attributes.insert("device_class".to_owned(), json!(device_class.as_str()));
    }
    if let Some(state_class) = template.state_class {
        attributes.insert("state_class".to_owned(), json!(state_class.as_str()));
    }
    if let Some(min) = template.min_value {
        attributes.insert("min".to_owned(), json!(min));
    }
    if let Some(max) = template.max_value {
        attributes.insert("max".to_owned(), json!(max));
    }
    if let Some(step) = template.step {
        attributes.insert("step".to_owned(), json!(step));
    }
    if let Some(options) = template.options {
        attributes.insert("options".to_owned(), json!(options));
    }
    attributes
}

fn state_for(
    description: &EntityDescription,
    snapshot: &PlantSnapshot,
    attributes: &mut Map<String, Value>,
) -> String {
    let value = snapshot.value(&description.component, description.item);

    match description.domain() {
        EntityDomain::Sensor | EntityDomain::Number => {
            value.map_or_else(|| STATE_UNKNOWN.to_owned(), format_state)
        }
        EntityDomain::Select => value.map_or_else(
            || STATE_UNKNOWN.to_owned(),
            |v| format_state(v.round()),
        ),
        EntityDomain::BinarySensor => match (value, description.template.on_state) {
            (Some(v), Some(on_state)) => {
                if v as i64 == on_state {
                    "on".to_owned()
                } else {
                    "off".to_owned()
                }
            }
            _ => STATE_UNKNOWN.to_owned(),
        },
        EntityDomain::Switch => value.map_or_else(
            || STATE_UNKNOWN.to_owned(),
            |v| if v as i64 != 0 { "on".to_owned() } else { "off".to_owned() },
        ),
        // Buttons are write-only triggers
        EntityDomain::Button => STATE_UNKNOWN.to_owned(),
        EntityDomain::Climate => {
            let circuit = description.component.index.unwrap_or(1);
            match climate::climate_view(snapshot, circuit) {
                Some(view) => {
                    attributes.insert(
                        "current_temperature".to_owned(),
                        json!(view.current_temperature),
                    );
                    attributes.insert("temperature".to_owned(), json!(view.target_temperature));
                    attributes.insert("hvac_action".to_owned(), json!(view.hvac_action));
                    attributes.insert("preset_mode".to_owned(), json!(view.preset_mode));
                    attributes.insert("preset_modes".to_owned(), json!(climate::preset_modes()));
                    attributes.insert("hvac_modes".to_owned(), json!(climate::hvac_modes()));
                    attributes.insert("min_temp".to_owned(), json!(view.min_temp));
                    attributes.insert("max_temp".to_owned(), json!(view.max_temp));
                    view.hvac_mode.to_owned()
                }
                None => STATE_UNKNOWN.to_owned(),
            }
        }
        EntityDomain::WaterHeater => {
            let boiler = description.component.index.unwrap_or(1);
            match water_heater::water_heater_view(snapshot, boiler) {
                Some(view) => {
                    attributes.insert(
                        "current_temperature".to_owned(),
                        json!(view.current_temperature),
                    );
                    attributes.insert("temperature".to_owned(), json!(view.target_temperature));
                    attributes.insert(
                        "operation_list".to_owned(),
                        json!(water_heater::operation_list()),
                    );
                    attributes.insert("min_temp".to_owned(), json!(view.min_temp));
                    attributes.insert("max_temp".to_owned(), json!(view.max_temp));
                    attributes.insert(
                        "target_temp_step".to_owned(),
                        json!(view.target_temperature_step),
                    );
                    view.current_operation
                        .unwrap_or(STATE_UNKNOWN)
                        .to_owned()
                }
                None => STATE_UNKNOWN.to_owned(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::build_descriptions;
    use thermion_core::{ComponentValues, Subsystem};
    use thermion_types::PlantConfig;

    fn config() -> PlantConfig {
        let mut config = PlantConfig::default();
        config.name = "My Heating".to_owned();
        config.components.heating_circuits = 1;
        config.components.buffers = 1;
        config.components.boilers = 1;
        config.components.heat_pump = true;
        config.normalize();
        config
    }

    fn snapshot() -> PlantSnapshot {
        let mut snapshot = PlantSnapshot::empty();
        snapshot.online = true;

        let mut hc = ComponentValues::new();
        hc.insert("supply_temperature", 31.5);
        hc.insert("room_temperature", 21.333);
        hc.insert("humidity", 45.0);
        hc.insert("limit_thermostat", 1.0);
        hc.insert("circulator_pump", 1.0);
        hc.insert("mixer_valve", 38.0);
        hc.insert("state", 12.0);
        hc.insert("target_supply_temperature", 30.5);
        hc.insert("cooling", 0.0);
        hc.insert("mode_holding", 2.0);
        snapshot.insert(Subsystem::HeatingCircuit, vec![hc]);

        let mut bo = ComponentValues::new();
        bo.insert("temperature", 52.4);
        bo.insert("state", 1.0);
        bo.insert("mode", 2.0);
        bo.insert("target_temperature", 55.0);
        bo.insert("mode_holding", 1.0);
        snapshot.insert(Subsystem::Boiler, vec![bo]);

        snapshot
    }

    fn find<'a>(entities: &'a [RenderedEntity], entity_id: &str) -> &'a RenderedEntity {
        entities
            .iter()
            .find(|e| e.entity_id == entity_id)
            .unwrap_or_else(|| panic!("missing entity {entity_id}"))
    }

    #[test]
    fn test_sensor_rendering() {
        let entities = render_all("My Heating", &build_descriptions(&config()), &snapshot());

        let supply = find(&entities, "sensor.my_heating_hc1_supply_temperature");
        assert_eq!(supply.state, "31.5");
        assert_eq!(supply.attributes["unit_of_measurement"], "°C");
        assert_eq!(supply.attributes["device_class"], "temperature");

        let room = find(&entities, "sensor.my_heating_hc1_room_temperature");
        assert_eq!(room.state, "21.33");
    }

    #[test]
    fn test_binary_sensor_on_state() {
        let entities = render_all("My Heating", &build_descriptions(&config()), &snapshot());

        // limit_thermostat is a problem sensor with on_state 0; raw 1 = off
        let thermostat = find(&entities, "binary_sensor.my_heating_hc1_limit_thermostat");
        assert_eq!(thermostat.state, "off");

        let pump = find(&entities, "binary_sensor.my_heating_hc1_circulator_pump");
        assert_eq!(pump.state, "on");
    }

    #[test]
    fn test_number_and_select_rendering() {
        let entities = render_all("My Heating", &build_descriptions(&config()), &snapshot());

        let target = find(&entities, "number.my_heating_hc1_target_supply_temperature");
        assert_eq!(target.state, "30.5");
        assert_eq!(target.attributes["min"], 0.0);
        assert_eq!(target.attributes["max"], 35.0);

        let mode = find(&entities, "select.my_heating_hc1_mode_holding");
        assert_eq!(mode.state, "2");
        assert_eq!(mode.attributes["options"][3], "3");
    }

    #[test]
    fn test_climate_rendering() {
        let entities = render_all("My Heating", &build_descriptions(&config()), &snapshot());

        let thermostat = find(&entities, "climate.my_heating_hc1_thermostat");
        assert_eq!(thermostat.state, "heat");
        assert_eq!(thermostat.attributes["hvac_action"], "heating");
        assert_eq!(thermostat.attributes["preset_mode"], "auto");
        assert_eq!(thermostat.attributes["current_temperature"], 31.5);
        assert_eq!(thermostat.attributes["temperature"], 30.5);
    }

    #[test]
    fn test_water_heater_rendering() {
        let entities = render_all("My Heating", &build_descriptions(&config()), &snapshot());

        let heater = find(&entities, "water_heater.my_heating_bo1_water_heater");
        assert_eq!(heater.state, "Immer An");
        assert_eq!(heater.attributes["current_temperature"], 52.4);
        assert_eq!(heater.attributes["temperature"], 55.0);
        assert_eq!(heater.attributes["min_temp"], 20.0);
    }

    #[test]
    fn test_offline_snapshot_marks_everything_unavailable() {
        let mut offline = snapshot();
        offline.online = false;
        let entities = render_all("My Heating", &build_descriptions(&config()), &offline);
        assert!(entities.iter().all(|e| e.state == STATE_UNAVAILABLE));
    }

    #[test]
    fn test_unpolled_value_is_unknown() {
        let entities = render_all("My Heating", &build_descriptions(&config()), &snapshot());
        // heat pump enabled but never polled in this snapshot
        let hp = find(&entities, "sensor.my_heating_hp_supply_temperature");
        assert_eq!(hp.state, STATE_UNKNOWN);
    }
}
