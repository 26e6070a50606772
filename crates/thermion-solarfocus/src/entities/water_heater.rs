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

//! Water heater platform: one entity per domestic hot water boiler.

use crate::modes::BoilerMode;
use thermion_core::describe::{
    EntityDescription, EntityDomain, EntityTemplate, create_description,
};
use thermion_core::{ComponentId, PlantSnapshot, Subsystem, WriteRequest, round2};
use thermion_types::ComponentsConfig;

pub const TEMP_WATER_MIN: f64 = 20.0;
pub const TEMP_WATER_MAX: f64 = 80.0;
pub const TARGET_TEMPERATURE_STEP: f64 = 0.1;

const WATER_HEATER_TYPES: &[EntityTemplate] =
    &[EntityTemplate::new("water_heater", EntityDomain::WaterHeater)];

/// Everything the water-heater entity shows for one boiler
#[derive(Debug, Clone, PartialEq)]
pub struct WaterHeaterView {
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
    pub current_operation: Option<&'static str>,
    pub min_temp: f64,
    pub max_temp: f64,
    pub target_temperature_step: f64,
}

/// Operation mode display strings in device order
pub fn operation_list() -> Vec<&'static str> {
    BoilerMode::all().iter().map(|m| m.display()).collect()
}

/// Compose the water-heater view for a boiler, `None` when the boiler has
/// never been read
pub fn water_heater_view(snapshot: &PlantSnapshot, boiler: u8) -> Option<WaterHeaterView> {
    let id = ComponentId::indexed(Subsystem::Boiler, boiler);
    let current = snapshot.value(&id, "temperature")?;

    let current_operation = snapshot
        .value(&id, "mode_holding")
        .and_then(|m| i32::try_from(m as i64).ok())
        .and_then(BoilerMode::from_i32)
        .map(|m| m.display());

    Some(WaterHeaterView {
        current_temperature: Some(round2(current)),
        target_temperature: snapshot.value(&id, "target_temperature").map(round2),
        current_operation,
        min_temp: TEMP_WATER_MIN,
        max_temp: TEMP_WATER_MAX,
        target_temperature_step: TARGET_TEMPERATURE_STEP,
    })
}

/// Write needed to change the boiler target temperature
pub fn set_temperature(boiler: u8, temperature: f64) -> WriteRequest {
    WriteRequest::new(
        ComponentId::indexed(Subsystem::Boiler, boiler),
        "target_temperature",
        round2(temperature),
    )
}

/// Write needed to change the boiler operation mode, `None` for an unknown
/// display string
pub fn set_operation_mode(boiler: u8, mode: &str) -> Option<WriteRequest> {
    let mode = BoilerMode::from_display(mode)?;
    Some(WriteRequest::new(
        ComponentId::indexed(Subsystem::Boiler, boiler),
        "mode_holding",
        f64::from(mode.to_i32()),
    ))
}

pub(crate) fn descriptions(components: &ComponentsConfig) -> Vec<EntityDescription> {
    let mut entities = Vec::new();
    for i in 1..=components.boilers {
        for template in WATER_HEATER_TYPES {
            entities.push(create_description(Subsystem::Boiler, Some(i), template));
        }
    }
    entities
}
