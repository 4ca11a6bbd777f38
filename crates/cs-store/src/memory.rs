//! In-process record store.

use crate::store::{RecordStore, WagonBatch};
use crate::{StoreError, StoreResult};
use cs_core::{TrainId, WagonId};
use cs_model::{LATEST_VERSION, Snapshot, Train, Wagon};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug)]
struct MemoryState {
    trains: BTreeMap<TrainId, Train>,
    wagons: BTreeMap<WagonId, Wagon>,
    by_train: BTreeMap<TrainId, BTreeSet<WagonId>>,
    next_train: TrainId,
    next_wagon: WagonId,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            trains: BTreeMap::new(),
            wagons: BTreeMap::new(),
            by_train: BTreeMap::new(),
            next_train: TrainId::first(),
            next_wagon: WagonId::first(),
        }
    }
}

/// Records kept in maps behind one lock. Each call is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn allocate_train_id(&self) -> StoreResult<TrainId> {
        let mut state = self.state.write();
        let id = state.next_train;
        state.next_train = id.next();
        Ok(id)
    }

    fn allocate_wagon_ids(&self, count: usize) -> StoreResult<Vec<WagonId>> {
        let mut state = self.state.write();
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = state.next_wagon;
            state.next_wagon = id.next();
            ids.push(id);
        }
        Ok(ids)
    }

    fn put_train(&self, train: &Train) -> StoreResult<()> {
        let mut state = self.state.write();
        state.by_train.entry(train.id).or_default();
        state.trains.insert(train.id, train.clone());
        Ok(())
    }

    fn get_train(&self, id: TrainId) -> StoreResult<Option<Train>> {
        Ok(self.state.read().trains.get(&id).cloned())
    }

    fn list_trains(&self) -> StoreResult<Vec<Train>> {
        Ok(self.state.read().trains.values().cloned().collect())
    }

    fn delete_train(&self, id: TrainId) -> StoreResult<bool> {
        let mut state = self.state.write();
        if state.trains.remove(&id).is_none() {
            return Ok(false);
        }
        if let Some(owned) = state.by_train.remove(&id) {
            for wagon_id in owned {
                state.wagons.remove(&wagon_id);
            }
        }
        Ok(true)
    }

    fn train_wagons(&self, train_id: TrainId) -> StoreResult<Vec<Wagon>> {
        let state = self.state.read();
        let Some(owned) = state.by_train.get(&train_id) else {
            return Ok(Vec::new());
        };
        Ok(owned
            .iter()
            .filter_map(|id| state.wagons.get(id).cloned())
            .collect())
    }

    fn commit_wagons(&self, train_id: TrainId, batch: &WagonBatch) -> StoreResult<()> {
        let mut state = self.state.write();
        if !state.trains.contains_key(&train_id) {
            return Err(StoreError::UnknownTrain(train_id));
        }
        for wagon in &batch.upserts {
            let owner = state
                .wagons
                .get(&wagon.id)
                .map(|w| w.train_id)
                .unwrap_or(wagon.train_id);
            if owner != train_id || wagon.train_id != train_id {
                return Err(StoreError::Reparent {
                    wagon_id: wagon.id,
                    owner,
                    requested: train_id,
                });
            }
        }
        for wagon_id in &batch.removals {
            if let Some(existing) = state.wagons.get(wagon_id)
                && existing.train_id != train_id
            {
                return Err(StoreError::Reparent {
                    wagon_id: *wagon_id,
                    owner: existing.train_id,
                    requested: train_id,
                });
            }
        }

        let state = &mut *state;
        let owned = state.by_train.entry(train_id).or_default();
        for wagon_id in &batch.removals {
            state.wagons.remove(wagon_id);
            owned.remove(wagon_id);
        }
        for wagon in &batch.upserts {
            owned.insert(wagon.id);
            state.wagons.insert(wagon.id, wagon.clone());
        }
        Ok(())
    }

    fn dump(&self) -> StoreResult<Snapshot> {
        let state = self.state.read();
        Ok(Snapshot {
            version: LATEST_VERSION,
            trains: state.trains.values().cloned().collect(),
            wagons: state.wagons.values().cloned().collect(),
        })
    }

    fn restore(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let mut next = MemoryState::default();
        for train in &snapshot.trains {
            next.by_train.entry(train.id).or_default();
            next.trains.insert(train.id, train.clone());
            if train.id >= next.next_train {
                next.next_train = train.id.next();
            }
        }
        for wagon in &snapshot.wagons {
            if !next.trains.contains_key(&wagon.train_id) {
                return Err(StoreError::UnknownTrain(wagon.train_id));
            }
            next.by_train
                .entry(wagon.train_id)
                .or_default()
                .insert(wagon.id);
            next.wagons.insert(wagon.id, wagon.clone());
            if wagon.id >= next.next_wagon {
                next.next_wagon = wagon.id.next();
            }
        }
        *self.state.write() = next;
        Ok(())
    }
}
