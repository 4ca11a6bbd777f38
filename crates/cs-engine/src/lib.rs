//! cs-engine: wagon ordering, train aggregates and the train registry.
//!
//! A [`Depot`] wires the pieces around one record store:
//! - [`TrainRegistry`] creates, updates, lists and deletes trains
//! - [`OrderingEngine`] mutates a train's wagon sequence
//! - [`WagonRepository`] reads and writes that sequence as a whole
//! - [`calculator`] derives length, weight and braking percentage

pub mod calculator;
pub mod engine;
pub mod error;
pub mod locks;
pub mod ordering;
pub mod registry;
pub mod repository;

pub use calculator::{TrainCalculation, calculate};
pub use engine::OrderingEngine;
pub use error::{EngineError, EngineResult, ReorderError};
pub use locks::TrainLocks;
pub use registry::TrainRegistry;
pub use repository::WagonRepository;

use cs_model::Snapshot;
use cs_store::RecordStore;
use std::sync::Arc;

/// Registry and ordering engine sharing one store and one lock table.
#[derive(Clone)]
pub struct Depot {
    store: Arc<dyn RecordStore>,
    locks: Arc<TrainLocks>,
    registry: TrainRegistry,
    wagons: OrderingEngine,
}

impl Depot {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let locks = Arc::new(TrainLocks::new());
        let registry = TrainRegistry::new(store.clone(), locks.clone());
        let wagons = OrderingEngine::new(WagonRepository::new(store.clone()), locks.clone());
        Self {
            store,
            locks,
            registry,
            wagons,
        }
    }

    pub fn registry(&self) -> &TrainRegistry {
        &self.registry
    }

    pub fn wagons(&self) -> &OrderingEngine {
        &self.wagons
    }

    pub fn locks(&self) -> &TrainLocks {
        &self.locks
    }

    /// Every record, taken while no train is being mutated.
    pub fn export(&self) -> EngineResult<Snapshot> {
        Ok(self.locks.exclusive(|| self.store.dump())?)
    }

    /// Replace all records, waiting for in-flight operations to finish.
    pub fn import(&self, snapshot: &Snapshot) -> EngineResult<()> {
        cs_model::validate_snapshot(snapshot)?;
        self.locks.exclusive(|| {
            self.store.restore(snapshot)?;
            self.locks.forget_idle();
            Ok::<_, EngineError>(())
        })?;
        tracing::info!(
            trains = snapshot.trains.len(),
            wagons = snapshot.wagons.len(),
            "imported snapshot"
        );
        Ok(())
    }
}
