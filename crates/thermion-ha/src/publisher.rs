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

//! State publisher: pushes rendered entities into Home Assistant after every
//! poll cycle, skipping entities whose state and attributes did not change.

use crate::client::HomeAssistantClient;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thermion_core::{PlantCoordinator, PlantSnapshot, RenderedEntity};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

/// Pushes entity states into Home Assistant, deduplicating unchanged ones
pub struct StatePublisher {
    client: Arc<HomeAssistantClient>,
    published: Mutex<HashMap<String, String>>,
}

impl std::fmt::Debug for StatePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatePublisher")
            .field("published", &self.published.lock().len())
            .finish()
    }
}

impl StatePublisher {
    pub fn new(client: Arc<HomeAssistantClient>) -> Self {
        Self {
            client,
            published: Mutex::new(HashMap::new()),
        }
    }

    /// Push all changed entities; returns the number actually sent
    pub async fn publish(&self, entities: &[RenderedEntity]) -> usize {
        let mut sent = 0;
        for entity in entities {
            let fingerprint = format!("{}|{}", entity.state, entity.attributes);
            let changed = self
                .published
                .lock()
                .get(&entity.entity_id)
                .is_none_or(|previous| *previous != fingerprint);
            if !changed {
                continue;
            }

            match self
                .client
                .post_state(&entity.entity_id, &entity.state, &entity.attributes)
                .await
            {
                Ok(()) => {
                    self.published
                        .lock()
                        .insert(entity.entity_id.clone(), fingerprint);
                    sent += 1;
                }
                Err(e) => {
                    // Keep going; the entity stays dirty and retries next cycle
                    warn!("Failed to publish {}: {}", entity.entity_id, e);
                }
            }
        }
        sent
    }

    /// Publish loop: renders and pushes after every coordinator cycle until
    /// the shutdown notify fires
    pub async fn run<F>(
        self: Arc<Self>,
        coordinator: Arc<PlantCoordinator>,
        render: F,
        shutdown: Arc<Notify>,
    ) where
        F: Fn(&PlantSnapshot) -> Vec<RenderedEntity> + Send + Sync,
    {
        let mut updates = coordinator.subscribe();
        info!("State publisher started");
        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    info!("State publisher shutting down");
                    break;
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        debug!("Coordinator gone, stopping publisher");
                        break;
                    }
                    let snapshot = coordinator.snapshot();
                    let entities = render(&snapshot);
                    let sent = self.publish(&entities).await;
                    debug!("Published {sent}/{} entities", entities.len());
                }
            }
        }
    }
}
