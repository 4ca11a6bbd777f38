//! Per-train mutual exclusion.

use crate::error::{EngineError, EngineResult};
use cs_core::TrainId;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// One read/write scope per train, plus a store-wide scope.
///
/// Mutations of a train run under its write scope, reads under its read
/// scope; trains never wait on each other. Whole-store work (snapshot
/// import/export) runs under the exclusive scope and waits for every train.
///
/// Scopes are created on first use and dropped again once an operation
/// finds the train missing, so unknown ids leave no entries behind.
#[derive(Debug, Default)]
pub struct TrainLocks {
    trains: DashMap<TrainId, Arc<RwLock<()>>>,
    store: RwLock<()>,
}

impl TrainLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, train_id: TrainId) -> Arc<RwLock<()>> {
        // Clone the Arc so the map shard is released before we block.
        self.trains.entry(train_id).or_default().clone()
    }

    pub fn write<T>(
        &self,
        train_id: TrainId,
        f: impl FnOnce() -> EngineResult<T>,
    ) -> EngineResult<T> {
        let _store = self.store.read();
        let lock = self.handle(train_id);
        let result = {
            let _guard = lock.write();
            f()
        };
        drop(lock);
        self.release_if_unknown(train_id, &result);
        result
    }

    pub fn read<T>(
        &self,
        train_id: TrainId,
        f: impl FnOnce() -> EngineResult<T>,
    ) -> EngineResult<T> {
        let _store = self.store.read();
        let lock = self.handle(train_id);
        let result = {
            let _guard = lock.read();
            f()
        };
        drop(lock);
        self.release_if_unknown(train_id, &result);
        result
    }

    /// Store-wide reads that touch no single train's wagons.
    pub fn shared<T>(&self, f: impl FnOnce() -> T) -> T {
        let _store = self.store.read();
        f()
    }

    pub fn exclusive<T>(&self, f: impl FnOnce() -> T) -> T {
        let _store = self.store.write();
        f()
    }

    fn release_if_unknown<T>(&self, train_id: TrainId, result: &EngineResult<T>) {
        if let Err(EngineError::TrainNotFound(id)) = result
            && *id == train_id
        {
            self.forget(train_id);
        }
    }

    /// Drop the scope of a deleted train unless another call still holds it.
    pub fn forget(&self, train_id: TrainId) {
        self.trains
            .remove_if(&train_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Drop every scope nobody holds. Called after the store was replaced.
    pub fn forget_idle(&self) {
        self.trains.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn tracked(&self) -> usize {
        self.trains.len()
    }
}
