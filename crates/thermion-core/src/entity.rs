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

use crate::describe::EntityDescription;
use serde::Serialize;

/// One entity rendered for the host platform: id, state string and the
/// attribute payload pushed alongside it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEntity {
    pub entity_id: String,
    pub state: String,
    pub attributes: serde_json::Value,
}

/// State string Home Assistant uses for an entity that cannot be read
pub const STATE_UNAVAILABLE: &str = "unavailable";
/// State string for an entity whose value is not known yet
pub const STATE_UNKNOWN: &str = "unknown";

/// Lowercase a name into an object-id fragment (spaces and punctuation
/// become underscores, repeated underscores collapse)
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_underscore = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_underscore = false;
        } else if !last_underscore {
            slug.push('_');
            last_underscore = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// Entity id for a description within one installation:
/// `{domain}.{installation}_{key}`
pub fn entity_id(installation: &str, description: &EntityDescription) -> String {
    format!(
        "{}.{}_{}",
        description.domain().as_str(),
        slugify(installation),
        description.key
    )
}

/// Format a scaled value the way the platform expects: integers without a
/// fraction, everything else rounded to two decimals
pub fn format_state(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

/// Round a scaled value to two decimals for attribute payloads
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl RenderedEntity {
    pub fn domain(&self) -> Option<&str> {
        self.entity_id.split('.').next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::{EntityDomain, EntityTemplate, create_description};
    use crate::traits::Subsystem;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Heating"), "my_heating");
        assert_eq!(slugify("solarfocus"), "solarfocus");
        assert_eq!(slugify("Haus (EG)"), "haus_eg");
        assert_eq!(slugify("  spaced  out  "), "spaced_out");
    }

    #[test]
    fn test_entity_id_composition() {
        let template = EntityTemplate::new("supply_temperature", EntityDomain::Sensor);
        let description = create_description(Subsystem::HeatingCircuit, Some(1), &template);
        assert_eq!(
            entity_id("My Heating", &description),
            "sensor.my_heating_hc1_supply_temperature"
        );
    }

    #[test]
    fn test_format_state_rounding() {
        assert_eq!(format_state(30.0), "30");
        assert_eq!(format_state(22.456), "22.46");
        assert_eq!(format_state(-3.10), "-3.1");
        assert_eq!(format_state(0.004), "0");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(21.4567), 21.46);
        assert_eq!(round2(21.0), 21.0);
    }
}
