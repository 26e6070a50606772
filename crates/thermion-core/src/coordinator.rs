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

//! Polling coordinator: fetches the enabled subsystems on an interval,
//! caches the latest snapshot and notifies dependents.

use crate::snapshot::PlantSnapshot;
use crate::traits::{PlantDataSource, Subsystem, WriteRequest};
use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tracing::{debug, info, warn};

/// The set of subsystems to poll, derived from the component configuration
#[derive(Debug, Clone, Default)]
pub struct PollPlan {
    entries: Vec<(Subsystem, u8)>,
}

impl PollPlan {
    /// Build the plan from enabled subsystems and instance counts
    pub fn from_config(components: &thermion_types::ComponentsConfig) -> Self {
        let mut entries = Vec::new();
        if components.heating_circuits > 0 {
            entries.push((Subsystem::HeatingCircuit, components.heating_circuits));
        }
        if components.buffers > 0 {
            entries.push((Subsystem::Buffer, components.buffers));
        }
        if components.boilers > 0 {
            entries.push((Subsystem::Boiler, components.boilers));
        }
        if components.heat_pump {
            entries.push((Subsystem::HeatPump, 1));
        }
        if components.biomass_boiler {
            entries.push((Subsystem::BiomassBoiler, 1));
        }
        if components.photovoltaic {
            entries.push((Subsystem::Photovoltaic, 1));
        }
        if components.solar {
            entries.push((Subsystem::Solar, 1));
        }
        if components.fresh_water_modules > 0 {
            entries.push((Subsystem::FreshWaterModule, components.fresh_water_modules));
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(Subsystem, u8)] {
        &self.entries
    }

    /// Configured instance count for a subsystem, 0 when disabled
    pub fn count(&self, subsystem: Subsystem) -> u8 {
        self.entries
            .iter()
            .find(|(s, _)| *s == subsystem)
            .map_or(0, |(_, n)| *n)
    }

    pub fn is_enabled(&self, subsystem: Subsystem) -> bool {
        self.count(subsystem) > 0
    }
}

/// Gets the latest data from the device and caches it for entities to read
pub struct PlantCoordinator {
    source: Arc<dyn PlantDataSource>,
    plan: PollPlan,
    snapshot: RwLock<PlantSnapshot>,
    last_update_success: AtomicBool,
    generation: AtomicU64,
    updates: watch::Sender<u64>,
}

impl std::fmt::Debug for PlantCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantCoordinator")
            .field("source", &self.source.name())
            .field("plan", &self.plan)
            .field(
                "last_update_success",
                &self.last_update_success.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl PlantCoordinator {
    pub fn new(source: Arc<dyn PlantDataSource>, plan: PollPlan) -> Self {
        let (updates, _) = watch::channel(0);
        Self {
            source,
            plan,
            snapshot: RwLock::new(PlantSnapshot::empty()),
            last_update_success: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            updates,
        }
    }

    /// Run one poll cycle over all enabled subsystems.
    ///
    /// A failing subsystem marks the cycle as failed but does not stop the
    /// remaining subsystems; its previous values are carried over so a
    /// transient error does not blank every entity.
    pub async fn refresh(&self) -> bool {
        let previous = self.snapshot.read().clone();
        let mut next = PlantSnapshot::empty();
        let mut success = true;

        for (subsystem, count) in self.plan.entries() {
            match self.source.read_components(*subsystem, *count).await {
                Ok(values) => next.insert(*subsystem, values),
                Err(e) => {
                    warn!("Failed to update {subsystem}: {e:#}");
                    success = false;
                    let carried = previous.components(*subsystem).to_vec();
                    if !carried.is_empty() {
                        next.insert(*subsystem, carried);
                    }
                }
            }
        }

        next.taken_at = Utc::now();
        next.online = success;
        *self.snapshot.write() = next;
        self.last_update_success.store(success, Ordering::SeqCst);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.updates.send(generation);

        if success {
            debug!("Data updated successfully");
        } else {
            debug!("Data update failed");
        }
        success
    }

    /// Latest snapshot (cloned; entities never hold the lock)
    pub fn snapshot(&self) -> PlantSnapshot {
        self.snapshot.read().clone()
    }

    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::SeqCst)
    }

    /// Subscribe to poll-cycle completions (value is a generation counter)
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates.subscribe()
    }

    pub fn plan(&self) -> &PollPlan {
        &self.plan
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Check whether the device currently answers
    pub async fn device_healthy(&self) -> bool {
        self.source.health_check().await.unwrap_or(false)
    }

    /// Forward a command to the device, then refresh so entity state converges
    pub async fn execute(&self, request: WriteRequest) -> Result<()> {
        info!(
            "Writing {} = {} on {}",
            request.item, request.value, request.component
        );
        self.source.write(&request).await?;
        self.refresh().await;
        Ok(())
    }

    /// Poll loop; runs until the shutdown notify fires
    pub async fn run(&self, interval: Duration, shutdown: Arc<Notify>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    info!("Coordinator shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.refresh().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ComponentId, ComponentValues, PlantDataSource};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use thermion_types::ComponentsConfig;

    struct MockSource {
        fail_subsystem: Mutex<Option<Subsystem>>,
        writes: Mutex<Vec<WriteRequest>>,
        reads: Mutex<u32>,
    }

    impl MockSource {
        fn new(fail_subsystem: Option<Subsystem>) -> Self {
            Self {
                fail_subsystem: Mutex::new(fail_subsystem),
                writes: Mutex::new(Vec::new()),
                reads: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl PlantDataSource for MockSource {
        async fn read_components(
            &self,
            subsystem: Subsystem,
            count: u8,
        ) -> Result<Vec<ComponentValues>> {
            *self.reads.lock() += 1;
            if *self.fail_subsystem.lock() == Some(subsystem) {
                anyhow::bail!("simulated read failure");
            }
            let mut out = Vec::new();
            for i in 0..count {
                let mut values = ComponentValues::new();
                values.insert("state", f64::from(i));
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
            "mock"
        }
    }

    fn plan() -> PollPlan {
        let components = ComponentsConfig {
            heating_circuits: 2,
            buffers: 1,
            boilers: 0,
            fresh_water_modules: 0,
            heat_pump: true,
            biomass_boiler: false,
            photovoltaic: false,
            solar: false,
        };
        PollPlan::from_config(&components)
    }

    #[test]
    fn test_plan_skips_disabled_subsystems() {
        let plan = plan();
        assert_eq!(plan.count(Subsystem::HeatingCircuit), 2);
        assert_eq!(plan.count(Subsystem::Buffer), 1);
        assert_eq!(plan.count(Subsystem::Boiler), 0);
        assert!(plan.is_enabled(Subsystem::HeatPump));
        assert!(!plan.is_enabled(Subsystem::BiomassBoiler));
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let source = Arc::new(MockSource::new(None));
        let coordinator = PlantCoordinator::new(source, plan());

        assert!(!coordinator.last_update_success());
        assert!(coordinator.refresh().await);
        assert!(coordinator.last_update_success());

        let snapshot = coordinator.snapshot();
        assert!(snapshot.online);
        assert_eq!(snapshot.components(Subsystem::HeatingCircuit).len(), 2);
        let hc2 = ComponentId::indexed(Subsystem::HeatingCircuit, 2);
        assert_eq!(snapshot.value(&hc2, "state"), Some(1.0));
    }

    #[tokio::test]
    async fn test_refresh_partial_failure_keeps_other_subsystems() {
        let source = Arc::new(MockSource::new(Some(Subsystem::Buffer)));
        let coordinator = PlantCoordinator::new(source, plan());

        assert!(!coordinator.refresh().await);
        assert!(!coordinator.last_update_success());

        let snapshot = coordinator.snapshot();
        assert!(!snapshot.online);
        // The failing subsystem is missing, the others still updated
        assert!(snapshot.components(Subsystem::Buffer).is_empty());
        assert_eq!(snapshot.components(Subsystem::HeatingCircuit).len(), 2);
    }

    #[tokio::test]
    async fn test_failed_subsystem_carries_previous_values() {
        let source = Arc::new(MockSource::new(None));
        let coordinator = PlantCoordinator::new(source.clone(), plan());
        assert!(coordinator.refresh().await);
        assert_eq!(coordinator.snapshot().components(Subsystem::Buffer).len(), 1);

        *source.fail_subsystem.lock() = Some(Subsystem::Buffer);
        assert!(!coordinator.refresh().await);

        // The buffer keeps its last good values even though the cycle failed
        let snapshot = coordinator.snapshot();
        assert!(!snapshot.online);
        assert_eq!(snapshot.components(Subsystem::Buffer).len(), 1);
        let bu1 = ComponentId::indexed(Subsystem::Buffer, 1);
        assert_eq!(snapshot.value(&bu1, "state"), Some(0.0));
    }

    #[tokio::test]
    async fn test_execute_writes_and_refreshes() {
        let source = Arc::new(MockSource::new(None));
        let coordinator = PlantCoordinator::new(source.clone(), plan());

        let request = WriteRequest::new(
            ComponentId::indexed(Subsystem::HeatingCircuit, 1),
            "mode_holding",
            3.0,
        );
        coordinator.execute(request.clone()).await.unwrap();

        assert_eq!(source.writes.lock().as_slice(), &[request]);
        // execute triggers a refresh
        assert!(coordinator.last_update_success());
    }

    #[tokio::test]
    async fn test_subscribe_sees_generation_advance() {
        let source = Arc::new(MockSource::new(None));
        let coordinator = PlantCoordinator::new(source, plan());
        let mut updates = coordinator.subscribe();

        assert_eq!(*updates.borrow(), 0);
        coordinator.refresh().await;
        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow_and_update(), 1);
    }
}
