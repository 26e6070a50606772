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

//! Error types for the Solarfocus device adapter

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolarfocusError {
    #[error("connection to {host}:{port} failed: {reason}")]
    Connect {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("modbus transport error: {0}")]
    Transport(String),

    #[error("modbus exception: {0}")]
    Exception(String),

    #[error("field '{field}' on {component} is not writable")]
    NotWritable { component: String, field: String },

    #[error("value {value} out of range for '{field}'")]
    ValueOutOfRange { field: String, value: f64 },

    #[error("address resolution failed for {0}")]
    AddressResolution(String),
}

pub type Result<T> = std::result::Result<T, SolarfocusError>;
