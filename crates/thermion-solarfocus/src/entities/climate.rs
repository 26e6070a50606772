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

//! Climate platform: one thermostat per heating circuit, composed from the
//! circuit's state, mode and temperature registers.

use crate::modes::HeatingCircuitMode;
use thermion_core::describe::{
    EntityDescription, EntityDomain, EntityTemplate, create_description,
};
use thermion_core::{ComponentId, PlantSnapshot, Subsystem, WriteRequest, round2};
use thermion_types::ComponentsConfig;

pub const PRESET_COMFORT: &str = "comfort";
pub const PRESET_ECO: &str = "eco";
pub const PRESET_AUTO: &str = "auto";
pub const PRESET_OFF: &str = "off";

pub const HVAC_MODE_HEAT: &str = "heat";
pub const HVAC_MODE_OFF: &str = "off";

pub const HVAC_ACTION_HEATING: &str = "heating";
pub const HVAC_ACTION_IDLE: &str = "idle";
pub const HVAC_ACTION_OFF: &str = "off";

/// Circuit states where the plant is not producing heat for the circuit
const STATES_OFF: &[i64] = &[0, 6, 7, 9, 10, 27, 28, 30];
/// Circuit state meaning "ready, not heating right now"
const STATE_IDLE: i64 = 31;

const CLIMATE_TYPES: &[EntityTemplate] =
    &[EntityTemplate::new("thermostat", EntityDomain::Climate)];

/// Map a circuit mode register value to the preset shown in the UI
pub fn preset_from_mode(mode: i64) -> Option<&'static str> {
    let mode = HeatingCircuitMode::from_i32(i32::try_from(mode).ok()?)?;
    Some(match mode {
        HeatingCircuitMode::AlwaysComfort => PRESET_COMFORT,
        HeatingCircuitMode::AlwaysLowering => PRESET_ECO,
        HeatingCircuitMode::Automatic => PRESET_AUTO,
        HeatingCircuitMode::Off => PRESET_OFF,
    })
}

/// Map a preset back to the circuit mode register value
pub fn mode_from_preset(preset: &str) -> Option<i64> {
    let mode = match preset {
        PRESET_COMFORT => HeatingCircuitMode::AlwaysComfort,
        PRESET_ECO => HeatingCircuitMode::AlwaysLowering,
        PRESET_AUTO => HeatingCircuitMode::Automatic,
        PRESET_OFF => HeatingCircuitMode::Off,
        _ => return None,
    };
    Some(i64::from(mode.to_i32()))
}

pub fn preset_modes() -> &'static [&'static str] {
    &[PRESET_COMFORT, PRESET_ECO, PRESET_AUTO, PRESET_OFF]
}

pub fn hvac_modes() -> &'static [&'static str] {
    &[HVAC_MODE_OFF, HVAC_MODE_HEAT]
}

/// Everything the climate entity shows for one heating circuit
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateView {
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
    pub hvac_mode: &'static str,
    pub hvac_action: &'static str,
    pub preset_mode: Option<&'static str>,
    pub min_temp: f64,
    pub max_temp: f64,
}

/// Compose the climate view for a heating circuit, `None` when the circuit
/// state has never been read
pub fn climate_view(snapshot: &PlantSnapshot, circuit: u8) -> Option<ClimateView> {
    let id = ComponentId::indexed(Subsystem::HeatingCircuit, circuit);
    let state = snapshot.value(&id, "state")? as i64;
    let cooling = snapshot.value(&id, "cooling").unwrap_or(0.0) as i64;

    let hvac_mode = if state == 0 {
        HVAC_MODE_OFF
    } else {
        HVAC_MODE_HEAT
    };

    let hvac_action = if STATES_OFF.contains(&state) {
        HVAC_ACTION_OFF
    } else if state == STATE_IDLE {
        HVAC_ACTION_IDLE
    } else {
        HVAC_ACTION_HEATING
    };

    // The supply range narrows considerably when the circuit runs in
    // cooling operation
    let (min_temp, max_temp) = if cooling == 1 { (7.0, 35.0) } else { (22.0, 45.0) };

    Some(ClimateView {
        current_temperature: snapshot.value(&id, "supply_temperature").map(round2),
        target_temperature: snapshot.value(&id, "target_supply_temperature").map(round2),
        hvac_mode,
        hvac_action,
        preset_mode: snapshot
            .value(&id, "mode_holding")
            .and_then(|m| preset_from_mode(m as i64)),
        min_temp,
        max_temp,
    })
}

/// Writes needed to apply a preset to a heating circuit
pub fn set_preset_mode(circuit: u8, preset: &str) -> Option<WriteRequest> {
    let mode = mode_from_preset(preset)?;
    Some(WriteRequest::new(
        ComponentId::indexed(Subsystem::HeatingCircuit, circuit),
        "mode_holding",
        mode as f64,
    ))
}

/// Writes needed to apply an HVAC mode to a heating circuit.
///
/// Turning heat on while the circuit reports state 0 also switches the mode
/// register to comfort, otherwise the circuit would stay dormant.
pub fn set_hvac_mode(snapshot: &PlantSnapshot, circuit: u8, hvac_mode: &str) -> Vec<WriteRequest> {
    let id = ComponentId::indexed(Subsystem::HeatingCircuit, circuit);
    match hvac_mode {
        HVAC_MODE_OFF => vec![WriteRequest::new(
            id,
            "mode_holding",
            f64::from(HeatingCircuitMode::Off.to_i32()),
        )],
        HVAC_MODE_HEAT => {
            let mut writes = Vec::new();
            if snapshot.value(&id, "state") == Some(0.0) {
                writes.push(WriteRequest::new(
                    id,
                    "mode_holding",
                    f64::from(HeatingCircuitMode::AlwaysComfort.to_i32()),
                ));
            }
            writes.push(WriteRequest::new(id, "cooling", 0.0));
            writes
        }
        _ => Vec::new(),
    }
}

pub(crate) fn descriptions(components: &ComponentsConfig) -> Vec<EntityDescription> {
    let mut entities = Vec::new();
    for i in 1..=components.heating_circuits {
        for template in CLIMATE_TYPES {
            entities.push(create_description(
                Subsystem::HeatingCircuit,
                Some(i),
                template,
            ));
        }
    }
    entities
}
