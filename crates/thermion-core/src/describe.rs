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

//! Entity description engine: static per-point templates are composed into
//! per-instance descriptions and filtered by firmware version and hardware
//! variant.

use crate::traits::{ComponentId, Subsystem};
use serde::Serialize;
use thermion_types::{ApiVersion, PlantKind};

/// Home Assistant entity domain an entity is exposed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityDomain {
    Sensor,
    BinarySensor,
    Number,
    Select,
    Switch,
    Button,
    Climate,
    WaterHeater,
}

impl EntityDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::BinarySensor => "binary_sensor",
            Self::Number => "number",
            Self::Select => "select",
            Self::Switch => "switch",
            Self::Button => "button",
            Self::Climate => "climate",
            Self::WaterHeater => "water_heater",
        }
    }
}

/// Home Assistant device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Temperature,
    Humidity,
    Power,
    Energy,
    Weight,
    Enum,
    Running,
    Problem,
    Lock,
    Door,
    Switch,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Power => "power",
            Self::Energy => "energy",
            Self::Weight => "weight",
            Self::Enum => "enum",
            Self::Running => "running",
            Self::Problem => "problem",
            Self::Lock => "lock",
            Self::Door => "door",
            Self::Switch => "switch",
        }
    }
}

/// Home Assistant sensor state class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    TotalIncreasing,
}

impl StateClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Measurement => "measurement",
            Self::TotalIncreasing => "total_increasing",
        }
    }
}

/// Home Assistant entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Config,
    Diagnostic,
}

impl EntityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Diagnostic => "diagnostic",
        }
    }
}

/// Static description of one exposed point, before instance composition
///
/// One row per point in the platform tables. Fields that a platform does not
/// use stay `None`; `since` and `plants` drive version/variant filtering.
#[derive(Debug, Clone, Copy)]
pub struct EntityTemplate {
    pub key: &'static str,
    pub domain: EntityDomain,
    pub unit: Option<&'static str>,
    pub icon: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    pub entity_category: Option<EntityCategory>,
    pub enabled_default: bool,
    /// Raw value meaning "on" for binary sensors
    pub on_state: Option<i64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub step: Option<f64>,
    /// Selectable raw values for select entities
    pub options: Option<&'static [&'static str]>,
    /// Minimum firmware API version exposing this point
    pub since: Option<ApiVersion>,
    /// Hardware variants this point applies to (all when `None`)
    pub plants: Option<&'static [PlantKind]>,
}

impl EntityTemplate {
    pub const fn new(key: &'static str, domain: EntityDomain) -> Self {
        Self {
            key,
            domain,
            unit: None,
            icon: None,
            device_class: None,
            state_class: None,
            entity_category: None,
            enabled_default: true,
            on_state: None,
            min_value: None,
            max_value: None,
            step: None,
            options: None,
            since: None,
            plants: None,
        }
    }
}

/// A fully composed description of one entity instance
#[derive(Debug, Clone)]
pub struct EntityDescription {
    /// Unique key within the installation, e.g. "hc2_supply_temperature"
    pub key: String,
    /// Register name the entity binds to, e.g. "supply_temperature"
    pub item: &'static str,
    /// Component instance the entity reads from / writes to
    pub component: ComponentId,
    /// Display name, e.g. "Heating Circuit 2 supply temperature"
    pub name: String,
    /// The static template the description was composed from
    pub template: EntityTemplate,
}

impl EntityDescription {
    pub fn domain(&self) -> EntityDomain {
        self.template.domain
    }
}

/// Compose a per-instance description from a template.
///
/// The key becomes `{prefix}{idx}_{item}` and the name
/// `{title} {idx} {item with underscores as spaces}`; for singleton
/// subsystems the index is omitted and double spaces collapse.
pub fn create_description(
    subsystem: Subsystem,
    index: Option<u8>,
    template: &EntityTemplate,
) -> EntityDescription {
    let idx = index.map(|i| i.to_string()).unwrap_or_default();
    let key = format!("{}{}_{}", subsystem.prefix(), idx, template.key);

    let raw_name = format!(
        "{} {} {}",
        subsystem.title(),
        idx,
        template.key.replace('_', " ")
    );
    // collapse the double space left by a missing index
    let name = raw_name.split_whitespace().collect::<Vec<_>>().join(" ");

    EntityDescription {
        key,
        item: template.key,
        component: ComponentId { subsystem, index },
        name,
        template: *template,
    }
}

/// Drop descriptions not applicable to the configured firmware version or
/// hardware variant
pub fn filter_version_and_plant(
    api_version: ApiVersion,
    plant: PlantKind,
    descriptions: Vec<EntityDescription>,
) -> Vec<EntityDescription> {
    descriptions
        .into_iter()
        .filter(|d| d.template.since.is_none_or(|since| api_version >= since))
        .filter(|d| d.template.plants.is_none_or(|plants| plants.contains(&plant)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: EntityTemplate = EntityTemplate {
        unit: Some("°C"),
        icon: Some("mdi:thermometer"),
        device_class: Some(DeviceClass::Temperature),
        state_class: Some(StateClass::Measurement),
        ..EntityTemplate::new("supply_temperature", EntityDomain::Sensor)
    };

    #[test]
    fn test_create_description_indexed() {
        let description = create_description(Subsystem::HeatingCircuit, Some(2), &TEMPLATE);
        assert_eq!(description.key, "hc2_supply_temperature");
        assert_eq!(description.name, "Heating Circuit 2 supply temperature");
        assert_eq!(description.item, "supply_temperature");
        assert_eq!(description.component.index, Some(2));
        assert_eq!(description.template.unit, Some("°C"));
    }

    #[test]
    fn test_create_description_singleton_collapses_spaces() {
        let template = EntityTemplate::new("evu_lock_active", EntityDomain::BinarySensor);
        let description = create_description(Subsystem::HeatPump, None, &template);
        assert_eq!(description.key, "hp_evu_lock_active");
        // no double space where the index would be
        assert_eq!(description.name, "Heatpump evu lock active");
    }

    #[test]
    fn test_filter_by_version() {
        let gated = EntityTemplate {
            since: Some(ApiVersion::V23_010),
            ..EntityTemplate::new("log_wood", EntityDomain::Sensor)
        };
        let open = EntityTemplate::new("temperature", EntityDomain::Sensor);
        let descriptions = vec![
            create_description(Subsystem::BiomassBoiler, None, &gated),
            create_description(Subsystem::BiomassBoiler, None, &open),
        ];

        let old = filter_version_and_plant(
            ApiVersion::V22_090,
            PlantKind::Therminator,
            descriptions.clone(),
        );
        assert_eq!(old.len(), 1);
        assert_eq!(old[0].item, "temperature");

        let new = filter_version_and_plant(
            ApiVersion::V23_010,
            PlantKind::Therminator,
            descriptions,
        );
        assert_eq!(new.len(), 2);
    }

    #[test]
    fn test_filter_by_plant() {
        let vampair_only = EntityTemplate {
            plants: Some(&[PlantKind::Vampair]),
            ..EntityTemplate::new("smart_grid", EntityDomain::Select)
        };
        let descriptions = vec![create_description(Subsystem::HeatPump, None, &vampair_only)];

        assert_eq!(
            filter_version_and_plant(
                ApiVersion::V23_020,
                PlantKind::Therminator,
                descriptions.clone()
            )
            .len(),
            0
        );
        assert_eq!(
            filter_version_and_plant(ApiVersion::V23_020, PlantKind::Vampair, descriptions).len(),
            1
        );
    }
}
