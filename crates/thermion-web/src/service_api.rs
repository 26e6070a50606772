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

//! Service endpoints mirroring the integration's registered services:
//! `set_heating_mode`, `set_operation_mode` and `set_smart_grid`.

use crate::routes::{ApiError, ApiState, api_error};
use axum::http::StatusCode;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use thermion_core::{ComponentId, Subsystem, WriteRequest};
use thermion_solarfocus::{BoilerMode, HeatingCircuitMode, SmartGridMode};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub success: bool,
}

fn default_instance() -> u8 {
    1
}

async fn execute(state: &ApiState, write: WriteRequest) -> Result<Json<ServiceResponse>, ApiError> {
    state
        .coordinator
        .execute(write)
        .await
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, format!("device write failed: {e}")))?;
    Ok(Json(ServiceResponse { success: true }))
}

fn check_instance(
    state: &ApiState,
    subsystem: Subsystem,
    instance: u8,
) -> Result<(), ApiError> {
    let count = state.coordinator.plan().count(subsystem);
    if instance == 0 || instance > count {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("{subsystem} {instance} is not configured (count: {count})"),
        ));
    }
    Ok(())
}

// ==================== POST /api/services/set_heating_mode ====================

/// Request for POST /api/services/set_heating_mode
#[derive(Debug, Deserialize)]
pub struct SetHeatingModeRequest {
    #[serde(default = "default_instance")]
    pub circuit: u8,
    /// 0 = always comfort, 1 = always lowering, 2 = automatic, 3 = off
    pub mode: i32,
}

pub async fn set_heating_mode(
    State(state): State<ApiState>,
    Json(request): Json<SetHeatingModeRequest>,
) -> Result<Json<ServiceResponse>, ApiError> {
    check_instance(&state, Subsystem::HeatingCircuit, request.circuit)?;
    let mode = HeatingCircuitMode::from_i32(request.mode).ok_or_else(|| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("invalid heating mode {}", request.mode),
        )
    })?;

    info!(
        "Service set_heating_mode: circuit {} -> {:?}",
        request.circuit, mode
    );
    execute(
        &state,
        WriteRequest::new(
            ComponentId::indexed(Subsystem::HeatingCircuit, request.circuit),
            "mode_holding",
            f64::from(mode.to_i32()),
        ),
    )
    .await
}

// ==================== POST /api/services/set_operation_mode ====================

/// Request for POST /api/services/set_operation_mode
#[derive(Debug, Deserialize)]
pub struct SetOperationModeRequest {
    #[serde(default = "default_instance")]
    pub boiler: u8,
    /// 0 = always off, 1 = always on, 2 = monday-sunday, 3 = blockwise,
    /// 4 = daywise
    pub mode: i32,
}

pub async fn set_operation_mode(
    State(state): State<ApiState>,
    Json(request): Json<SetOperationModeRequest>,
) -> Result<Json<ServiceResponse>, ApiError> {
    check_instance(&state, Subsystem::Boiler, request.boiler)?;
    let mode = BoilerMode::from_i32(request.mode).ok_or_else(|| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("invalid operation mode {}", request.mode),
        )
    })?;

    info!(
        "Service set_operation_mode: boiler {} -> {:?}",
        request.boiler, mode
    );
    execute(
        &state,
        WriteRequest::new(
            ComponentId::indexed(Subsystem::Boiler, request.boiler),
            "mode_holding",
            f64::from(mode.to_i32()),
        ),
    )
    .await
}

// ==================== POST /api/services/set_smart_grid ====================

/// Request for POST /api/services/set_smart_grid
#[derive(Debug, Deserialize)]
pub struct SetSmartGridRequest {
    /// 2 = normal, 4 = elevated
    pub mode: i32,
}

pub async fn set_smart_grid(
    State(state): State<ApiState>,
    Json(request): Json<SetSmartGridRequest>,
) -> Result<Json<ServiceResponse>, ApiError> {
    if !state.coordinator.plan().is_enabled(Subsystem::HeatPump) {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            "no heat pump configured",
        ));
    }
    let mode = SmartGridMode::from_i32(request.mode).ok_or_else(|| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("invalid smart grid mode {} (expected 2 or 4)", request.mode),
        )
    })?;

    info!("Service set_smart_grid: -> {:?}", mode);
    execute(
        &state,
        WriteRequest::new(
            ComponentId::singleton(Subsystem::HeatPump),
            "smart_grid",
            f64::from(mode.to_i32()),
        ),
    )
    .await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use thermion_core::{ComponentValues, PlantCoordinator, PlantDataSource, PollPlan};
    use thermion_solarfocus::entities::build_descriptions;
    use thermion_types::PlantConfig;

    /// Data source with canned values, recording writes
    pub(crate) struct RecordingSource {
        writes: Mutex<Vec<WriteRequest>>,
    }

    impl RecordingSource {
        pub(crate) fn new() -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn writes(&self) -> Vec<WriteRequest> {
            self.writes.lock().clone()
        }
    }

    #[async_trait]
    impl PlantDataSource for RecordingSource {
        async fn read_components(
            &self,
            subsystem: Subsystem,
            count: u8,
        ) -> Result<Vec<ComponentValues>> {
            let mut out = Vec::new();
            for _ in 0..count {
                let mut values = ComponentValues::new();
                match subsystem {
                    Subsystem::HeatingCircuit => {
                        values.insert("supply_temperature", 31.5);
                        values.insert("room_temperature", 21.0);
                        values.insert("state", 12.0);
                        values.insert("cooling", 0.0);
                        values.insert("mode_holding", 2.0);
                        values.insert("target_supply_temperature", 30.0);
                    }
                    Subsystem::Boiler => {
                        values.insert("temperature", 52.4);
                        values.insert("state", 1.0);
                        values.insert("mode", 2.0);
                        values.insert("mode_holding", 1.0);
                        values.insert("target_temperature", 55.0);
                    }
                    Subsystem::HeatPump => {
                        values.insert("supply_temperature", 35.0);
                        values.insert("smart_grid", 2.0);
                        values.insert("evu_lock", 0.0);
                    }
                    Subsystem::Buffer
                    | Subsystem::BiomassBoiler
                    | Subsystem::Photovoltaic
                    | Subsystem::Solar
                    | Subsystem::FreshWaterModule => {
                        values.insert("state", 0.0);
                    }
                }
                out.push(values);
            }
            Ok(out)
        }

        async fn write(&self, request: &WriteRequest) -> Result<()> {
            self.writes.lock().push(request.clone());
            Ok(())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    /// A ready-to-use API state over a vampair config with one of everything
    pub(crate) async fn test_state() -> (ApiState, Arc<RecordingSource>) {
        let mut config = PlantConfig::default();
        config.components.heating_circuits = 1;
        config.components.buffers = 1;
        config.components.boilers = 1;
        config.components.heat_pump = true;
        config.normalize();

        let source = Arc::new(RecordingSource::new());
        let coordinator = Arc::new(PlantCoordinator::new(
            source.clone(),
            PollPlan::from_config(&config.components),
        ));
        assert!(coordinator.refresh().await);

        let descriptions = Arc::new(build_descriptions(&config));
        let state = ApiState::new(coordinator, descriptions, Arc::new(config));
        (state, source)
    }

    #[tokio::test]
    async fn test_set_heating_mode() {
        let (state, source) = test_state().await;
        let response = set_heating_mode(
            State(state),
            Json(SetHeatingModeRequest {
                circuit: 1,
                mode: 3,
            }),
        )
        .await
        .unwrap();
        assert!(response.0.success);

        let writes = source.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].component.to_string(), "hc1");
        assert_eq!(writes[0].item, "mode_holding");
        assert_eq!(writes[0].value, 3.0);
    }

    #[tokio::test]
    async fn test_set_heating_mode_rejects_unknown_circuit() {
        let (state, source) = test_state().await;
        let err = set_heating_mode(
            State(state),
            Json(SetHeatingModeRequest {
                circuit: 5,
                mode: 0,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert!(source.writes().is_empty());
    }

    #[tokio::test]
    async fn test_set_heating_mode_rejects_invalid_mode() {
        let (state, _source) = test_state().await;
        let err = set_heating_mode(
            State(state),
            Json(SetHeatingModeRequest {
                circuit: 1,
                mode: 9,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_set_operation_mode() {
        let (state, source) = test_state().await;
        let response = set_operation_mode(
            State(state),
            Json(SetOperationModeRequest { boiler: 1, mode: 4 }),
        )
        .await
        .unwrap();
        assert!(response.0.success);
        assert_eq!(source.writes()[0].component.to_string(), "bo1");
        assert_eq!(source.writes()[0].value, 4.0);
    }

    #[tokio::test]
    async fn test_set_smart_grid_validates_device_values() {
        let (state, source) = test_state().await;

        let err = set_smart_grid(State(state.clone()), Json(SetSmartGridRequest { mode: 3 }))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);

        let response = set_smart_grid(State(state), Json(SetSmartGridRequest { mode: 4 }))
            .await
            .unwrap();
        assert!(response.0.success);
        assert_eq!(source.writes()[0].item, "smart_grid");
        assert_eq!(source.writes()[0].value, 4.0);
    }

    #[tokio::test]
    async fn test_set_smart_grid_without_heat_pump() {
        let mut config = PlantConfig::default();
        config.plant.kind = thermion_types::PlantKind::Therminator;
        config.components.biomass_boiler = true;
        config.normalize();

        let source = Arc::new(RecordingSource::new());
        let coordinator = Arc::new(PlantCoordinator::new(
            source,
            PollPlan::from_config(&config.components),
        ));
        let state = ApiState::new(
            coordinator,
            Arc::new(build_descriptions(&config)),
            Arc::new(config),
        );

        let err = set_smart_grid(State(state), Json(SetSmartGridRequest { mode: 2 }))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }
}
