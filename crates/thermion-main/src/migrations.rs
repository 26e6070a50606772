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

//! Configuration schema migrations.
//!
//! Older config files are upgraded step by step on the raw TOML value before
//! typed deserialization. Every step is a pure rename/move, matching the
//! schema revisions the configuration record went through:
//!
//! - v1 -> v2: `components.pelletsboiler` renamed to `biomass_boiler`
//! - v2 -> v3: top-level `host`/`port`/`scan_interval_secs` moved into
//!   `[connection]`
//! - v3 -> v4: `plant.api_version` introduced, defaulting to "21.140"
//! - v4 -> v5: boolean per-instance component flags widened to counts under
//!   their plural names

use thermion_types::CONFIG_SCHEMA_VERSION;
use toml::Value;
use toml::map::Map;
use tracing::info;

/// Apply all pending migrations and stamp the current schema version
pub fn migrate(mut value: Value) -> Value {
    let version = value
        .get("version")
        .and_then(Value::as_integer)
        .unwrap_or(1) as u32;

    if version >= CONFIG_SCHEMA_VERSION {
        return value;
    }

    info!(
        "Migrating configuration from schema v{} to v{}",
        version, CONFIG_SCHEMA_VERSION
    );

    if version < 2 {
        rename_pelletsboiler(&mut value);
    }
    if version < 3 {
        move_connection_fields(&mut value);
    }
    if version < 4 {
        seed_api_version(&mut value);
    }
    if version < 5 {
        widen_component_counts(&mut value);
    }

    if let Some(table) = value.as_table_mut() {
        table.insert(
            "version".to_owned(),
            Value::Integer(i64::from(CONFIG_SCHEMA_VERSION)),
        );
    }
    value
}

/// v1 -> v2: the biomass boiler flag used to be called `pelletsboiler`
fn rename_pelletsboiler(value: &mut Value) {
    if let Some(components) = value.get_mut("components").and_then(Value::as_table_mut)
        && let Some(flag) = components.remove("pelletsboiler")
    {
        components.insert("biomass_boiler".to_owned(), flag);
    }
}

/// v2 -> v3: connection settings moved from the top level into `[connection]`
fn move_connection_fields(value: &mut Value) {
    let Some(table) = value.as_table_mut() else {
        return;
    };

    let mut moved = Map::new();
    for field in ["host", "port", "scan_interval_secs"] {
        if let Some(v) = table.remove(field) {
            moved.insert(field.to_owned(), v);
        }
    }
    if moved.is_empty() {
        return;
    }

    match table.get_mut("connection").and_then(Value::as_table_mut) {
        Some(connection) => {
            for (field, v) in moved {
                // an explicit [connection] value wins over a stray top-level one
                if !connection.contains_key(&field) {
                    connection.insert(field, v);
                }
            }
        }
        None => {
            table.insert("connection".to_owned(), Value::Table(moved));
        }
    }
}

/// v3 -> v4: entries written before the api_version selector existed ran
/// against the oldest supported firmware
fn seed_api_version(value: &mut Value) {
    let Some(table) = value.as_table_mut() else {
        return;
    };

    if !table.contains_key("plant") {
        table.insert("plant".to_owned(), Value::Table(Map::new()));
    }
    if let Some(plant) = table.get_mut("plant").and_then(Value::as_table_mut)
        && !plant.contains_key("api_version")
    {
        plant.insert("api_version".to_owned(), Value::String("21.140".to_owned()));
    }
}

/// v4 -> v5: per-instance subsystems were boolean flags before the count
/// selectors existed
fn widen_component_counts(value: &mut Value) {
    let Some(components) = value.get_mut("components").and_then(Value::as_table_mut) else {
        return;
    };

    for (old, new) in [
        ("heating_circuit", "heating_circuits"),
        ("buffer", "buffers"),
        ("boiler", "boilers"),
        ("fresh_water_module", "fresh_water_modules"),
    ] {
        let Some(v) = components.remove(old) else {
            continue;
        };
        let count = match v {
            Value::Boolean(true) => 1,
            Value::Boolean(false) => 0,
            Value::Integer(i) => i,
            // anything else: keep the subsystem enabled rather than losing it
            _ => 1,
        };
        if !components.contains_key(new) {
            components.insert(new.to_owned(), Value::Integer(count));
        }
    }
}
