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

mod config;
mod migrations;
mod version;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use thermion_core::{PlantCoordinator, PollPlan};
use thermion_ha::{HomeAssistantClient, StatePublisher};
use thermion_solarfocus::SolarfocusClient;
use thermion_solarfocus::entities::{build_descriptions, render_all};
use thermion_types::PlantConfig;
use thermion_web::ApiState;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Handle command line arguments
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" => {
                println!("ThermION - Solarfocus Home Assistant Bridge");
                println!("Version: {}", version::VERSION);
                println!();
                println!("Usage: thermion [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help    Print this help message");
                println!("  -v, --version Print version");
                return Ok(());
            }
            "--version" | "-v" => {
                println!("{}", version::VERSION);
                return Ok(());
            }
            _ => {
                // Continue to normal execution for other args
            }
        }
    }

    // Initialize tracing with env filter support
    // Respects RUST_LOG environment variable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = config::load_config_with_fallback()?;

    info!("Starting ThermION - Solarfocus Home Assistant Bridge");
    info!("Configuration Summary:");
    info!("   Installation: {}", config.name);
    info!(
        "   Device: {}:{} ({} / API {})",
        config.connection.host, config.connection.port, config.plant.kind, config.plant.api_version
    );
    info!(
        "   Components: {} heating circuit(s), {} buffer(s), {} boiler(s), {} fresh water module(s)",
        config.components.heating_circuits,
        config.components.buffers,
        config.components.boilers,
        config.components.fresh_water_modules
    );
    info!(
        "   Heat pump: {}, biomass boiler: {}, photovoltaic: {}, solar: {}",
        config.components.heat_pump,
        config.components.biomass_boiler,
        config.components.photovoltaic,
        config.components.solar
    );
    info!("   Poll interval: {}s", config.connection.scan_interval_secs);
    info!("   Web API port: {}", config.web.port);
    info!("   Debug mode: {}", config.system.debug_mode);

    run(config).await
}

async fn run(config: PlantConfig) -> Result<()> {
    let source = Arc::new(
        SolarfocusClient::new(
            config.connection.host.clone(),
            config.connection.port,
            config.plant.api_version,
        )
        .with_debug_mode(config.system.debug_mode),
    );

    let plan = PollPlan::from_config(&config.components);
    let coordinator = Arc::new(PlantCoordinator::new(source, plan));

    // The device must answer before the bridge comes up, mirroring the
    // setup-time connectivity check of the configuration flow
    if !coordinator.refresh().await {
        anyhow::bail!(
            "initial poll of {}:{} failed, is the device reachable?",
            config.connection.host,
            config.connection.port
        );
    }
    info!("Initial poll succeeded");

    let descriptions = Arc::new(build_descriptions(&config));
    info!("Exposing {} entities", descriptions.len());

    let config = Arc::new(config);
    let shutdown = Arc::new(Notify::new());
    let mut tasks = Vec::new();

    // Poll loop
    {
        let coordinator = coordinator.clone();
        let shutdown = shutdown.clone();
        let interval = Duration::from_secs(config.connection.scan_interval_secs);
        tasks.push(tokio::spawn(async move {
            coordinator.run(interval, shutdown).await;
        }));
    }

    // Home Assistant publisher (optional: the web API keeps working without)
    match build_ha_client(&config) {
        Some(client) => {
            let publisher = Arc::new(StatePublisher::new(Arc::new(client)));
            let coordinator = coordinator.clone();
            let shutdown = shutdown.clone();
            let descriptions = descriptions.clone();
            let name = config.name.clone();
            tasks.push(tokio::spawn(async move {
                publisher
                    .run(
                        coordinator,
                        move |snapshot| render_all(&name, &descriptions, snapshot),
                        shutdown,
                    )
                    .await;
            }));
        }
        None => {
            warn!("No Home Assistant credentials configured, state push disabled");
        }
    }

    // Command/status HTTP API
    let api_state = ApiState::new(coordinator, descriptions, config.clone());
    let app = thermion_web::router(api_state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.web.port))
        .await
        .context(format!("Failed to bind web API port {}", config.web.port))?;
    info!("Web API listening on {}", listener.local_addr()?);

    let server_shutdown = shutdown.clone();
    let server = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                server_shutdown.notified().await;
            })
            .await;
        if let Err(e) = result {
            error!("Web API server error: {e}");
        }
    });

    wait_for_shutdown_signal().await;
    info!("Shutdown signal received");
    shutdown.notify_waiters();

    for task in tasks {
        let _ = task.await;
    }
    let _ = server.await;
    info!("Shutting down");

    Ok(())
}

fn build_ha_client(config: &PlantConfig) -> Option<HomeAssistantClient> {
    let result = if std::env::var("SUPERVISOR_TOKEN").is_ok() {
        info!("Initializing HA client using Supervisor API");
        HomeAssistantClient::from_supervisor()
    } else {
        info!("Initializing HA client from configuration");
        HomeAssistantClient::from_config(config.ha.base_url.clone(), config.ha.token.clone())
    };

    match result {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Home Assistant client unavailable: {e}");
            None
        }
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
