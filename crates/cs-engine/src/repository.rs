//! Wagon records of a train, read and written as one ordered sequence.

use crate::error::{EngineError, EngineResult};
use crate::ordering;
use cs_core::{TrainId, WagonId};
use cs_model::{Wagon, WagonSpec};
use cs_store::{RecordStore, WagonBatch};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Owns the wagon set of each train on top of a [`RecordStore`].
///
/// Callers hold the train's write scope around every mutating call.
#[derive(Clone)]
pub struct WagonRepository {
    store: Arc<dyn RecordStore>,
}

impl WagonRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn ensure_train(&self, train_id: TrainId) -> EngineResult<()> {
        match self.store.get_train(train_id)? {
            Some(_) => Ok(()),
            None => Err(EngineError::TrainNotFound(train_id)),
        }
    }

    /// The train's wagons in position order. Stored positions that are not
    /// `1..=N` are reported, never repaired.
    pub fn get(&self, train_id: TrainId) -> EngineResult<Vec<Wagon>> {
        self.ensure_train(train_id)?;
        let mut wagons = self.store.train_wagons(train_id)?;
        ordering::sort_by_position(&mut wagons);
        ordering::check_contiguous(&wagons)?;
        Ok(wagons)
    }

    /// Fresh identities for new wagons.
    pub fn fresh_ids(&self, count: usize) -> EngineResult<Vec<WagonId>> {
        Ok(self.store.allocate_wagon_ids(count)?)
    }

    /// Insert a new wagon at `position` (append when `None`).
    pub fn insert(
        &self,
        train_id: TrainId,
        position: Option<u32>,
        spec: WagonSpec,
    ) -> EngineResult<Wagon> {
        let before = self.get(train_id)?;
        let index = ordering::insertion_index(before.len(), position)?;

        let id = self.fresh_ids(1)?[0];
        let mut after = before.clone();
        let wagon = Wagon {
            id,
            train_id,
            position: 0,
            spec,
        };
        ordering::insert_at(&mut after, Some(index as u32 + 1), wagon)?;
        self.commit(train_id, &before, &after)?;
        Ok(after[index].clone())
    }

    /// Remove a wagon of this train and compact the positions behind it.
    pub fn remove(&self, train_id: TrainId, wagon_id: WagonId) -> EngineResult<Wagon> {
        let before = self.get(train_id)?;
        let mut after = before.clone();
        let removed = ordering::remove(&mut after, wagon_id)
            .ok_or(EngineError::WagonNotFound { train_id, wagon_id })?;
        self.commit(train_id, &before, &after)?;
        Ok(removed)
    }

    /// Store `sequence` as the train's complete wagon list, in that order.
    ///
    /// Wagons missing from `sequence` are deleted; positions are reassigned.
    pub fn replace_all(&self, train_id: TrainId, mut sequence: Vec<Wagon>) -> EngineResult<Vec<Wagon>> {
        if let Some(foreign) = sequence.iter().find(|w| w.train_id != train_id) {
            return Err(EngineError::InvalidArgument {
                what: format!("wagon {} belongs to train {}", foreign.id, foreign.train_id),
            });
        }
        let mut seen = HashSet::with_capacity(sequence.len());
        if let Some(dup) = sequence.iter().find(|w| !seen.insert(w.id)) {
            return Err(EngineError::InvalidArgument {
                what: format!("wagon {} appears twice", dup.id),
            });
        }

        let before = self.get(train_id)?;
        ordering::renumber(&mut sequence);
        self.commit(train_id, &before, &sequence)?;
        Ok(sequence)
    }

    // Write only what changed between the two sequences.
    fn commit(&self, train_id: TrainId, before: &[Wagon], after: &[Wagon]) -> EngineResult<()> {
        ordering::check_contiguous(after)?;

        let previous: HashMap<WagonId, &Wagon> = before.iter().map(|w| (w.id, w)).collect();
        let kept: HashSet<WagonId> = after.iter().map(|w| w.id).collect();
        let batch = WagonBatch {
            upserts: after
                .iter()
                .filter(|w| previous.get(&w.id).is_none_or(|p| *p != *w))
                .cloned()
                .collect(),
            removals: before
                .iter()
                .map(|w| w.id)
                .filter(|id| !kept.contains(id))
                .collect(),
        };
        if batch.is_empty() {
            return Ok(());
        }
        self.store.commit_wagons(train_id, &batch)?;
        Ok(())
    }
}
