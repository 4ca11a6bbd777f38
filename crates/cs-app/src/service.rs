//! Train and wagon operations for front ends.

use std::path::Path;
use std::sync::Arc;

use cs_core::{TrainId, WagonId};
use cs_engine::{Depot, EngineError, TrainCalculation};
use cs_model::{NewTrain, NewWagon, Snapshot, Train, TrainPatch, Wagon, WagonPatch};
use cs_store::{FileStore, MemoryStore, RecordStore};
use tracing::info;

use crate::config::{AppConfig, StoreBackend};
use crate::error::AppResult;

/// Summary of a train for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    pub train: Train,
    pub wagon_count: usize,
    pub calculation: TrainCalculation,
}

/// One entry point for every train and wagon operation.
#[derive(Clone)]
pub struct ConsistService {
    depot: Depot,
}

impl ConsistService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            depot: Depot::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Open the store the configuration names.
    pub fn open(config: &AppConfig) -> AppResult<Self> {
        let store: Arc<dyn RecordStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::File => Arc::new(FileStore::new(config.store.data_dir.clone())?),
        };
        info!(backend = ?config.store.backend, "opened record store");
        Ok(Self::new(store))
    }

    pub fn list_trains(&self) -> AppResult<Vec<Train>> {
        Ok(self.depot.registry().list_trains()?)
    }

    /// Trains with their wagon count and aggregates, newest first.
    pub fn list_train_summaries(&self) -> AppResult<Vec<TrainSummary>> {
        let mut summaries = Vec::new();
        for train in self.list_trains()? {
            // Deleted between the listing and this read.
            let wagons = match self.depot.wagons().list_wagons(train.id) {
                Ok(wagons) => wagons,
                Err(EngineError::TrainNotFound(_)) => continue,
                Err(err) => return Err(err.into()),
            };
            summaries.push(TrainSummary {
                calculation: cs_engine::calculate(&wagons),
                wagon_count: wagons.len(),
                train,
            });
        }
        Ok(summaries)
    }

    pub fn create_train(
        &self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<Train> {
        Ok(self.depot.registry().create_train(NewTrain {
            name: name.into(),
            description,
        })?)
    }

    pub fn get_train(&self, train_id: TrainId) -> AppResult<Train> {
        Ok(self.depot.registry().get_train(train_id)?)
    }

    pub fn update_train(&self, train_id: TrainId, patch: TrainPatch) -> AppResult<Train> {
        Ok(self.depot.registry().update_train(train_id, patch)?)
    }

    pub fn delete_train(&self, train_id: TrainId) -> AppResult<()> {
        Ok(self.depot.registry().delete_train(train_id)?)
    }

    pub fn list_wagons(&self, train_id: TrainId) -> AppResult<Vec<Wagon>> {
        Ok(self.depot.wagons().list_wagons(train_id)?)
    }

    pub fn create_wagon(&self, train_id: TrainId, payload: NewWagon) -> AppResult<Wagon> {
        Ok(self.depot.wagons().create_wagon(train_id, payload)?)
    }

    pub fn update_wagon(
        &self,
        train_id: TrainId,
        wagon_id: WagonId,
        patch: WagonPatch,
    ) -> AppResult<Wagon> {
        Ok(self.depot.wagons().update_wagon(train_id, wagon_id, patch)?)
    }

    pub fn delete_wagon(&self, train_id: TrainId, wagon_id: WagonId) -> AppResult<()> {
        Ok(self.depot.wagons().delete_wagon(train_id, wagon_id)?)
    }

    pub fn clone_wagon(
        &self,
        train_id: TrainId,
        wagon_id: WagonId,
        quantity: u32,
    ) -> AppResult<Vec<Wagon>> {
        Ok(self.depot.wagons().clone_wagon(train_id, wagon_id, quantity)?)
    }

    pub fn reorder_wagons(&self, train_id: TrainId, order: &[WagonId]) -> AppResult<Vec<Wagon>> {
        Ok(self.depot.wagons().reorder_wagons(train_id, order)?)
    }

    pub fn get_calculation(&self, train_id: TrainId) -> AppResult<TrainCalculation> {
        Ok(self.depot.wagons().calculate(train_id)?)
    }

    pub fn snapshot(&self) -> AppResult<Snapshot> {
        Ok(self.depot.export()?)
    }

    /// Write every record to `path`, YAML or JSON by extension.
    pub fn export_snapshot(&self, path: &Path) -> AppResult<Snapshot> {
        let snapshot = self.snapshot()?;
        cs_model::save_snapshot(path, &snapshot)?;
        info!(path = %path.display(), trains = snapshot.trains.len(), "exported snapshot");
        Ok(snapshot)
    }

    /// Replace every record with the contents of `path`.
    pub fn import_snapshot(&self, path: &Path) -> AppResult<Snapshot> {
        let snapshot = cs_model::load_snapshot(path)?;
        self.depot.import(&snapshot)?;
        Ok(snapshot)
    }
}
