//! CRUD over train records.

use crate::error::{EngineError, EngineResult};
use crate::locks::TrainLocks;
use chrono::Utc;
use cs_core::TrainId;
use cs_model::{NewTrain, Train, TrainPatch, validate_new_train, validate_train_patch};
use cs_store::RecordStore;
use std::sync::Arc;
use tracing::{debug, info};

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|s| !s.is_empty())
}

#[derive(Clone)]
pub struct TrainRegistry {
    store: Arc<dyn RecordStore>,
    locks: Arc<TrainLocks>,
}

impl TrainRegistry {
    pub fn new(store: Arc<dyn RecordStore>, locks: Arc<TrainLocks>) -> Self {
        Self { store, locks }
    }

    pub fn create_train(&self, payload: NewTrain) -> EngineResult<Train> {
        validate_new_train(&payload)?;
        let id = self.store.allocate_train_id()?;
        let now = Utc::now();
        let train = Train {
            id,
            name: payload.name,
            description: non_empty(payload.description),
            created_at: now,
            updated_at: now,
        };
        self.locks.write(id, || Ok(self.store.put_train(&train)?))?;
        info!(train_id = %id, name = %train.name, "created train");
        Ok(train)
    }

    pub fn get_train(&self, id: TrainId) -> EngineResult<Train> {
        self.locks.shared(|| self.load_train(id))
    }

    /// All trains, newest first.
    pub fn list_trains(&self) -> EngineResult<Vec<Train>> {
        let mut trains = self.locks.shared(|| self.store.list_trains())?;
        trains.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        debug!(count = trains.len(), "listed trains");
        Ok(trains)
    }

    pub fn update_train(&self, id: TrainId, patch: TrainPatch) -> EngineResult<Train> {
        validate_train_patch(&patch)?;
        self.locks.write(id, || {
            let mut train = self.load_train(id)?;
            if patch.is_empty() {
                return Ok(train);
            }
            if let Some(name) = patch.name {
                train.name = name;
            }
            if let Some(description) = patch.description {
                train.description = non_empty(Some(description));
            }
            train.updated_at = Utc::now();
            self.store.put_train(&train)?;
            info!(train_id = %id, "updated train");
            Ok(train)
        })
    }

    // Callers hold the store scope already.
    fn load_train(&self, id: TrainId) -> EngineResult<Train> {
        self.store
            .get_train(id)?
            .ok_or(EngineError::TrainNotFound(id))
    }

    /// Delete the train together with all of its wagons.
    pub fn delete_train(&self, id: TrainId) -> EngineResult<()> {
        self.locks.write(id, || {
            if !self.store.delete_train(id)? {
                return Err(EngineError::TrainNotFound(id));
            }
            Ok(())
        })?;
        self.locks.forget(id);
        info!(train_id = %id, "deleted train");
        Ok(())
    }
}
