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

//! Modbus TCP adapter implementing [`PlantDataSource`].
//!
//! The wire protocol itself lives in `tokio-modbus`; this adapter owns the
//! connection lifecycle (connect on first use, reconnect once on a transport
//! error) and the mapping between component blocks and register addresses.

use crate::components::component_map;
use crate::error::{Result, SolarfocusError};
use anyhow::Result as AnyResult;
use async_trait::async_trait;
use thermion_core::{ComponentValues, PlantDataSource, Subsystem, WriteRequest};
use thermion_types::ApiVersion;
use tokio::sync::Mutex;
use tokio_modbus::prelude::*;
use tracing::{debug, info, warn};

/// Which register table a block read targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Input,
    Holding,
}

/// Modbus TCP client for a Solarfocus plant controller
pub struct SolarfocusClient {
    host: String,
    port: u16,
    api_version: ApiVersion,
    /// When set, writes are logged but never sent to the device
    debug_mode: bool,
    ctx: Mutex<Option<client::Context>>,
}

impl std::fmt::Debug for SolarfocusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolarfocusClient")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_version", &self.api_version)
            .field("debug_mode", &self.debug_mode)
            .finish()
    }
}

impl SolarfocusClient {
    pub fn new(host: impl Into<String>, port: u16, api_version: ApiVersion) -> Self {
        Self {
            host: host.into(),
            port,
            api_version,
            debug_mode: false,
            ctx: Mutex::new(None),
        }
    }

    /// Log writes instead of sending them to the device
    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    async fn connect(&self) -> Result<client::Context> {
        let target = format!("{}:{}", self.host, self.port);
        let addr = tokio::net::lookup_host(&target)
            .await
            .map_err(|e| SolarfocusError::AddressResolution(format!("{target}: {e}")))?
            .next()
            .ok_or_else(|| SolarfocusError::AddressResolution(target.clone()))?;

        debug!("Connecting to {addr}");
        tcp::connect_slave(addr, Slave(1))
            .await
            .map_err(|e| SolarfocusError::Connect {
                host: self.host.clone(),
                port: self.port,
                reason: e.to_string(),
            })
    }

    async fn ensure_connected(&self, slot: &mut Option<client::Context>) -> Result<()> {
        if slot.is_none() {
            *slot = Some(self.connect().await?);
            info!("Connected to {}:{}", self.host, self.port);
        }
        Ok(())
    }

    /// Read a contiguous register block, reconnecting once on a transport
    /// error
    async fn read_block(&self, kind: BlockKind, address: u16, count: u16) -> Result<Vec<u16>> {
        let mut guard = self.ctx.lock().await;
        self.ensure_connected(&mut guard).await?;

        for attempt in 0..2 {
            let ctx = guard
                .as_mut()
                .ok_or_else(|| SolarfocusError::Transport("not connected".to_owned()))?;
            let response = match kind {
                BlockKind::Input => ctx.read_input_registers(address, count).await,
                BlockKind::Holding => ctx.read_holding_registers(address, count).await,
            };
            match response {
                Ok(inner) => {
                    return inner.map_err(|e| SolarfocusError::Exception(e.to_string()));
                }
                Err(e) if attempt == 0 => {
                    warn!("Read of {count} registers at {address} failed, reconnecting: {e}");
                    *guard = None;
                    self.ensure_connected(&mut guard).await?;
                }
                Err(e) => return Err(SolarfocusError::Transport(e.to_string())),
            }
        }
        unreachable!("read loop returns within two attempts")
    }

    /// Write a register block, reconnecting once on a transport error
    async fn write_block(&self, address: u16, words: &[u16]) -> Result<()> {
        let mut guard = self.ctx.lock().await;
        self.ensure_connected(&mut guard).await?;

        for attempt in 0..2 {
            let ctx = guard
                .as_mut()
                .ok_or_else(|| SolarfocusError::Transport("not connected".to_owned()))?;
            let response = if words.len() == 1 {
                ctx.write_single_register(address, words[0]).await
            } else {
                ctx.write_multiple_registers(address, words).await
            };
            match response {
                Ok(inner) => {
                    return inner.map_err(|e| SolarfocusError::Exception(e.to_string()));
                }
                Err(e) if attempt == 0 => {
                    warn!("Write to {address} failed, reconnecting: {e}");
                    *guard = None;
                    self.ensure_connected(&mut guard).await?;
                }
                Err(e) => return Err(SolarfocusError::Transport(e.to_string())),
            }
        }
        unreachable!("write loop returns within two attempts")
    }
}

/// Fill in the heat pump efficiency figures the controller does not report
/// directly: coefficients of performance from the current power readings and
/// seasonal performance factors from the energy counters.
fn derive_heat_pump_metrics(values: &mut ComponentValues) {
    fn ratio(values: &ComponentValues, numerator: &str, denominator: &str) -> Option<f64> {
        let n = values.get(numerator)?;
        let d = values.get(denominator)?;
        (d > 0.0).then(|| n / d)
    }

    if let Some(cop) = ratio(values, "thermal_power_heating", "electrical_power") {
        values.insert("cop_heating", cop);
    }
    if let Some(cop) = ratio(values, "thermal_power_cooling", "electrical_power") {
        values.insert("cop_cooling", cop);
    }
    if let Some(spf) = ratio(values, "thermal_energy_total", "electrical_energy_total") {
        values.insert("performance_overall", spf);
    }
    if let Some(spf) = ratio(values, "thermal_energy_heating", "electrical_energy_heating") {
        values.insert("performance_overall_heating", spf);
    }
    if let Some(spf) = ratio(
        values,
        "thermal_energy_drinking_water",
        "electrical_energy_drinking_water",
    ) {
        values.insert("performance_overall_drinking_water", spf);
    }
}

#[async_trait]
impl PlantDataSource for SolarfocusClient {
    async fn read_components(
        &self,
        subsystem: Subsystem,
        count: u8,
    ) -> AnyResult<Vec<ComponentValues>> {
        let map = component_map(subsystem);
        let mut out = Vec::with_capacity(count as usize);

        for slot in 0..count {
            let inputs = self
                .read_block(BlockKind::Input, map.input_address(slot), map.input_count)
                .await?;
            let holdings = if map.holding_count > 0 {
                self.read_block(
                    BlockKind::Holding,
                    map.holding_address(slot),
                    map.holding_count,
                )
                .await?
            } else {
                Vec::new()
            };

            let mut values = map.decode(&inputs, &holdings, self.api_version);
            if subsystem == Subsystem::HeatPump {
                derive_heat_pump_metrics(&mut values);
            }
            debug!(
                "Read {} values for {subsystem} instance {}",
                values.len(),
                slot + 1
            );
            out.push(values);
        }

        Ok(out)
    }

    async fn write(&self, request: &WriteRequest) -> AnyResult<()> {
        let map = component_map(request.component.subsystem);
        let spec =
            map.holding(&request.item)
                .ok_or_else(|| SolarfocusError::NotWritable {
                    component: request.component.to_string(),
                    field: request.item.clone(),
                })?;

        let words = spec.unscale(request.value)?;
        let address = map.holding_address(request.component.slot() as u8) + spec.offset;

        if self.debug_mode {
            info!(
                "DEBUG MODE: would write {:?} to register {address} ({} on {})",
                words, request.item, request.component
            );
            return Ok(());
        }

        self.write_block(address, &words).await?;
        info!(
            "Wrote {} = {} (register {address})",
            request.item, request.value
        );
        Ok(())
    }

    async fn health_check(&self) -> AnyResult<bool> {
        // A one-register read of the boiler block answers on every variant
        let map = component_map(Subsystem::Boiler);
        match self.read_block(BlockKind::Input, map.input_base, 1).await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!("Health check failed: {e}");
                Ok(false)
            }
        }
    }

    fn name(&self) -> &str {
        "solarfocus-modbus"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heat_pump_values() -> ComponentValues {
        let mut values = ComponentValues::new();
        values.insert("thermal_power_heating", 5600.0);
        values.insert("thermal_power_cooling", 0.0);
        values.insert("electrical_power", 1400.0);
        values.insert("thermal_energy_total", 12000.0);
        values.insert("electrical_energy_total", 3000.0);
        values.insert("thermal_energy_heating", 9000.0);
        values.insert("electrical_energy_heating", 2500.0);
        values.insert("thermal_energy_drinking_water", 3000.0);
        values.insert("electrical_energy_drinking_water", 500.0);
        values
    }

    #[test]
    fn test_derived_cop_and_spf() {
        let mut values = heat_pump_values();
        derive_heat_pump_metrics(&mut values);

        assert_eq!(values.get("cop_heating"), Some(4.0));
        assert_eq!(values.get("cop_cooling"), Some(0.0));
        assert_eq!(values.get("performance_overall"), Some(4.0));
        assert_eq!(values.get("performance_overall_heating"), Some(3.6));
        assert_eq!(values.get("performance_overall_drinking_water"), Some(6.0));
    }

    #[test]
    fn test_derived_metrics_guard_division_by_zero() {
        let mut values = ComponentValues::new();
        values.insert("thermal_power_heating", 5600.0);
        values.insert("electrical_power", 0.0);
        derive_heat_pump_metrics(&mut values);
        assert_eq!(values.get("cop_heating"), None);
    }

    #[test]
    fn test_debug_mode_flag() {
        let client =
            SolarfocusClient::new("localhost", 502, ApiVersion::V23_020).with_debug_mode(true);
        assert!(client.debug_mode);
    }
}
