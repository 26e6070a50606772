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

use crate::service_api;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, extract::Path, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thermion_core::describe::{EntityDescription, EntityDomain};
use thermion_core::{PlantCoordinator, RenderedEntity, WriteRequest, entity_id};
use thermion_solarfocus::entities::{climate, render_all, water_heater};
use thermion_types::PlantConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared state for the bridge API endpoints
#[derive(Clone)]
pub struct ApiState {
    pub coordinator: Arc<PlantCoordinator>,
    pub descriptions: Arc<Vec<EntityDescription>>,
    pub config: Arc<PlantConfig>,
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("entities", &self.descriptions.len())
            .finish()
    }
}

impl ApiState {
    pub fn new(
        coordinator: Arc<PlantCoordinator>,
        descriptions: Arc<Vec<EntityDescription>>,
        config: Arc<PlantConfig>,
    ) -> Self {
        Self {
            coordinator,
            descriptions,
            config,
        }
    }

    /// Resolve an entity description by its rendered entity id
    pub fn find_entity(&self, id: &str) -> Option<&EntityDescription> {
        self.descriptions
            .iter()
            .find(|d| entity_id(&self.config.name, d) == id)
    }
}

/// Error payload returned by all endpoints
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorBody>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Build the bridge API router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/status", get(status))
        .route("/api/entities", get(list_entities))
        .route("/api/entities/{entity_id}/set", post(set_entity))
        .route(
            "/api/services/set_heating_mode",
            post(service_api::set_heating_mode),
        )
        .route(
            "/api/services/set_operation_mode",
            post(service_api::set_operation_mode),
        )
        .route(
            "/api/services/set_smart_grid",
            post(service_api::set_smart_grid),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ==================== GET /api/health ====================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub device_online: bool,
}

pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        device_online: state.coordinator.last_update_success(),
    })
}

// ==================== GET /api/status ====================

#[derive(Debug, Serialize)]
pub struct SubsystemStatus {
    pub subsystem: String,
    pub count: u8,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub plant: String,
    pub api_version: String,
    pub last_update_success: bool,
    pub snapshot_taken_at: String,
    pub entities: usize,
    pub subsystems: Vec<SubsystemStatus>,
}

pub async fn status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let snapshot = state.coordinator.snapshot();
    let subsystems = state
        .coordinator
        .plan()
        .entries()
        .iter()
        .map(|(subsystem, count)| SubsystemStatus {
            subsystem: subsystem.to_string(),
            count: *count,
        })
        .collect();

    Json(StatusResponse {
        name: state.config.name.clone(),
        plant: state.config.plant.kind.to_string(),
        api_version: state.config.plant.api_version.to_string(),
        last_update_success: state.coordinator.last_update_success(),
        snapshot_taken_at: snapshot.taken_at.to_rfc3339(),
        entities: state.descriptions.len(),
        subsystems,
    })
}

// ==================== GET /api/entities ====================

pub async fn list_entities(State(state): State<ApiState>) -> Json<Vec<RenderedEntity>> {
    let snapshot = state.coordinator.snapshot();
    Json(render_all(&state.config.name, &state.descriptions, &snapshot))
}

// ==================== POST /api/entities/{entity_id}/set ====================

/// Request for POST /api/entities/{entity_id}/set
///
/// `value` drives number/select/switch entities; climate and water-heater
/// entities take their dedicated fields instead.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetEntityRequest {
    pub value: Option<Value>,
    pub preset_mode: Option<String>,
    pub hvac_mode: Option<String>,
    pub temperature: Option<f64>,
    pub operation_mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetEntityResponse {
    pub success: bool,
    pub writes: usize,
}

pub async fn set_entity(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<SetEntityRequest>,
) -> Result<Json<SetEntityResponse>, ApiError> {
    let description = state
        .find_entity(&id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown entity {id}")))?
        .clone();

    let writes = writes_for(&state, &description, &request)?;
    if writes.is_empty() {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "request does not change anything",
        ));
    }

    info!("Entity command for {}: {} write(s)", id, writes.len());
    let count = writes.len();
    for write in writes {
        state.coordinator.execute(write).await.map_err(|e| {
            warn!("Write failed for {}: {:#}", id, e);
            api_error(StatusCode::BAD_GATEWAY, format!("device write failed: {e}"))
        })?;
    }

    Ok(Json(SetEntityResponse {
        success: true,
        writes: count,
    }))
}

/// Translate a set request into device writes, validating against the
/// entity description
fn writes_for(
    state: &ApiState,
    description: &EntityDescription,
    request: &SetEntityRequest,
) -> Result<Vec<WriteRequest>, ApiError> {
    let template = &description.template;
    match description.domain() {
        EntityDomain::Number => {
            let value = number_value(request)?;
            if let Some(min) = template.min_value
                && value < min
            {
                return Err(api_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("value {value} below minimum {min}"),
                ));
            }
            if let Some(max) = template.max_value
                && value > max
            {
                return Err(api_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("value {value} above maximum {max}"),
                ));
            }
            Ok(vec![WriteRequest::new(
                description.component,
                description.item,
                value,
            )])
        }
        EntityDomain::Select => {
            let option = request
                .value
                .as_ref()
                .and_then(|v| v.as_str().map(str::to_owned).or_else(|| v.as_i64().map(|n| n.to_string())))
                .ok_or_else(|| {
                    api_error(StatusCode::UNPROCESSABLE_ENTITY, "missing option value")
                })?;
            let options = template.options.unwrap_or(&[]);
            if !options.contains(&option.as_str()) {
                return Err(api_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("'{option}' is not one of {options:?}"),
                ));
            }
            let value = option.parse::<f64>().map_err(|_| {
                api_error(StatusCode::UNPROCESSABLE_ENTITY, "option is not numeric")
            })?;
            Ok(vec![WriteRequest::new(
                description.component,
                description.item,
                value,
            )])
        }
        EntityDomain::Switch => {
            let on = match request.value.as_ref() {
                Some(Value::Bool(b)) => *b,
                Some(Value::String(s)) if s == "on" => true,
                Some(Value::String(s)) if s == "off" => false,
                Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0) != 0.0,
                _ => {
                    return Err(api_error(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "expected true/false or \"on\"/\"off\"",
                    ));
                }
            };
            Ok(vec![WriteRequest::new(
                description.component,
                description.item,
                if on { 1.0 } else { 0.0 },
            )])
        }
        EntityDomain::Button => Ok(vec![WriteRequest::new(
            description.component,
            description.item,
            1.0,
        )]),
        EntityDomain::Climate => {
            let circuit = description.component.index.unwrap_or(1);
            if let Some(preset) = &request.preset_mode {
                let write = climate::set_preset_mode(circuit, preset).ok_or_else(|| {
                    api_error(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        format!("unknown preset '{preset}'"),
                    )
                })?;
                return Ok(vec![write]);
            }
            if let Some(hvac_mode) = &request.hvac_mode {
                let snapshot = state.coordinator.snapshot();
                let writes = climate::set_hvac_mode(&snapshot, circuit, hvac_mode);
                if writes.is_empty() {
                    return Err(api_error(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        format!("unknown hvac mode '{hvac_mode}'"),
                    ));
                }
                return Ok(writes);
            }
            Err(api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "expected preset_mode or hvac_mode",
            ))
        }
        EntityDomain::WaterHeater => {
            let boiler = description.component.index.unwrap_or(1);
            if let Some(temperature) = request.temperature {
                if !(water_heater::TEMP_WATER_MIN..=water_heater::TEMP_WATER_MAX)
                    .contains(&temperature)
                {
                    return Err(api_error(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        format!("temperature {temperature} outside 20-80 °C"),
                    ));
                }
                return Ok(vec![water_heater::set_temperature(boiler, temperature)]);
            }
            if let Some(mode) = &request.operation_mode {
                let write = water_heater::set_operation_mode(boiler, mode).ok_or_else(|| {
                    api_error(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        format!("unknown operation mode '{mode}'"),
                    )
                })?;
                return Ok(vec![write]);
            }
            Err(api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "expected temperature or operation_mode",
            ))
        }
        EntityDomain::Sensor | EntityDomain::BinarySensor => Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "entity is read-only",
        )),
    }
}

fn number_value(request: &SetEntityRequest) -> Result<f64, ApiError> {
    request
        .value
        .as_ref()
        .and_then(|v| {
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        })
        .ok_or_else(|| api_error(StatusCode::UNPROCESSABLE_ENTITY, "missing numeric value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_api::tests::test_state;
    use serde_json::json;

    fn set_request(value: Value) -> SetEntityRequest {
        SetEntityRequest {
            value: Some(value),
            ..SetEntityRequest::default()
        }
    }

    #[tokio::test]
    async fn test_health_and_status() {
        let (state, _source) = test_state().await;

        let health = health(State(state.clone())).await;
        assert!(health.0.device_online);

        let status = status(State(state)).await;
        assert_eq!(status.0.plant, "Heat pump vampair");
        assert!(status.0.entities > 0);
        assert!(status.0.last_update_success);
    }

    #[tokio::test]
    async fn test_list_entities_renders_current_values() {
        let (state, _source) = test_state().await;
        let entities = list_entities(State(state)).await;
        let supply = entities
            .0
            .iter()
            .find(|e| e.entity_id == "sensor.solarfocus_hc1_supply_temperature")
            .unwrap();
        assert_eq!(supply.state, "31.5");
    }

    #[tokio::test]
    async fn test_set_number_validates_range() {
        let (state, source) = test_state().await;
        let id = "number.solarfocus_hc1_target_supply_temperature".to_owned();

        let err = set_entity(
            State(state.clone()),
            Path(id.clone()),
            Json(set_request(json!(90.0))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(source.writes().is_empty());

        let ok = set_entity(State(state), Path(id), Json(set_request(json!(28.5))))
            .await
            .unwrap();
        assert!(ok.0.success);
        let writes = source.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].item, "target_supply_temperature");
        assert_eq!(writes[0].value, 28.5);
    }

    #[tokio::test]
    async fn test_set_select_validates_options() {
        let (state, source) = test_state().await;
        let id = "select.solarfocus_hc1_mode_holding".to_owned();

        let err = set_entity(
            State(state.clone()),
            Path(id.clone()),
            Json(set_request(json!("7"))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);

        let ok = set_entity(State(state), Path(id), Json(set_request(json!("3"))))
            .await
            .unwrap();
        assert!(ok.0.success);
        assert_eq!(source.writes()[0].value, 3.0);
    }

    #[tokio::test]
    async fn test_set_unknown_entity_is_404() {
        let (state, _source) = test_state().await;
        let err = set_entity(
            State(state),
            Path("sensor.nope".to_owned()),
            Json(SetEntityRequest::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sensor_is_read_only() {
        let (state, _source) = test_state().await;
        let err = set_entity(
            State(state),
            Path("sensor.solarfocus_hc1_supply_temperature".to_owned()),
            Json(set_request(json!(1))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_climate_preset_command() {
        let (state, source) = test_state().await;
        let request = SetEntityRequest {
            preset_mode: Some("eco".to_owned()),
            ..SetEntityRequest::default()
        };
        let ok = set_entity(
            State(state),
            Path("climate.solarfocus_hc1_thermostat".to_owned()),
            Json(request),
        )
        .await
        .unwrap();
        assert!(ok.0.success);
        let writes = source.writes();
        assert_eq!(writes[0].item, "mode_holding");
        assert_eq!(writes[0].value, 1.0);
    }

    #[tokio::test]
    async fn test_water_heater_commands() {
        let (state, source) = test_state().await;
        let id = "water_heater.solarfocus_bo1_water_heater".to_owned();

        let ok = set_entity(
            State(state.clone()),
            Path(id.clone()),
            Json(SetEntityRequest {
                temperature: Some(55.0),
                ..SetEntityRequest::default()
            }),
        )
        .await
        .unwrap();
        assert!(ok.0.success);
        assert_eq!(source.writes()[0].item, "target_temperature");

        let err = set_entity(
            State(state),
            Path(id),
            Json(SetEntityRequest {
                operation_mode: Some("Nie".to_owned()),
                ..SetEntityRequest::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_button_press() {
        let (state, source) = test_state().await;
        let ok = set_entity(
            State(state),
            Path("button.solarfocus_bo1_enable_single_charge".to_owned()),
            Json(SetEntityRequest::default()),
        )
        .await
        .unwrap();
        assert!(ok.0.success);
        let writes = source.writes();
        assert_eq!(writes[0].item, "enable_single_charge");
        assert_eq!(writes[0].value, 1.0);
    }
}
