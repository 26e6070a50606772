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

//! Button platform description tables (one-shot triggers).

use thermion_core::Subsystem;
use thermion_core::describe::{
    EntityDescription, EntityDomain, EntityTemplate, create_description,
};
use thermion_types::ComponentsConfig;

const BOILER_BUTTON_TYPES: &[EntityTemplate] = &[
    EntityTemplate {
        icon: Some("mdi:water-boiler"),
        ..EntityTemplate::new("enable_single_charge", EntityDomain::Button)
    },
    EntityTemplate {
        icon: Some("mdi:reload"),
        ..EntityTemplate::new("enable_circulation", EntityDomain::Button)
    },
];

pub(crate) fn descriptions(components: &ComponentsConfig) -> Vec<EntityDescription> {
    let mut entities = Vec::new();

    for i in 1..=components.boilers {
        for template in BOILER_BUTTON_TYPES {
            entities.push(create_description(Subsystem::Boiler, Some(i), template));
        }
    }

    entities
}
