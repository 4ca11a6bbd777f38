//! Ordered wagon mutations, each one atomic per train.

use crate::calculator::{self, TrainCalculation};
use crate::error::{EngineError, EngineResult};
use crate::locks::TrainLocks;
use crate::ordering;
use crate::repository::WagonRepository;
use cs_core::{TrainId, WagonId};
use cs_model::{NewWagon, Wagon, WagonPatch, validate_wagon_spec};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Applies create/delete/clone/reorder/update to a train's wagon sequence.
///
/// Every call reads, renumbers and writes the whole sequence inside the
/// train's write scope, so readers only ever see contiguous positions.
#[derive(Clone)]
pub struct OrderingEngine {
    repo: WagonRepository,
    locks: Arc<TrainLocks>,
}

impl OrderingEngine {
    pub fn new(repo: WagonRepository, locks: Arc<TrainLocks>) -> Self {
        Self { repo, locks }
    }

    pub fn list_wagons(&self, train_id: TrainId) -> EngineResult<Vec<Wagon>> {
        let wagons = self.locks.read(train_id, || self.repo.get(train_id))?;
        debug!(train_id = %train_id, count = wagons.len(), "listed wagons");
        Ok(wagons)
    }

    pub fn calculate(&self, train_id: TrainId) -> EngineResult<TrainCalculation> {
        let wagons = self.list_wagons(train_id)?;
        Ok(calculator::calculate(&wagons))
    }

    pub fn create_wagon(&self, train_id: TrainId, payload: NewWagon) -> EngineResult<Wagon> {
        validate_wagon_spec(&payload.spec)?;
        let wagon = self.locks.write(train_id, || {
            self.repo.insert(train_id, payload.position, payload.spec)
        })?;
        info!(
            train_id = %train_id,
            wagon_id = %wagon.id,
            position = wagon.position,
            "created wagon"
        );
        Ok(wagon)
    }

    pub fn delete_wagon(&self, train_id: TrainId, wagon_id: WagonId) -> EngineResult<()> {
        let removed = self
            .locks
            .write(train_id, || self.repo.remove(train_id, wagon_id))?;
        info!(
            train_id = %train_id,
            wagon_id = %wagon_id,
            position = removed.position,
            "deleted wagon"
        );
        Ok(())
    }

    /// Insert `quantity` copies of a wagon directly behind it.
    pub fn clone_wagon(
        &self,
        train_id: TrainId,
        wagon_id: WagonId,
        quantity: u32,
    ) -> EngineResult<Vec<Wagon>> {
        if quantity < 1 {
            warn!(train_id = %train_id, wagon_id = %wagon_id, "rejected clone quantity 0");
            return Err(EngineError::InvalidArgument {
                what: "clone quantity must be at least 1".to_string(),
            });
        }

        let copies = self.locks.write(train_id, || {
            let mut wagons = self.repo.get(train_id)?;
            if !wagons.iter().any(|w| w.id == wagon_id) {
                return Err(EngineError::WagonNotFound { train_id, wagon_id });
            }
            let new_ids = self.repo.fresh_ids(quantity as usize)?;
            let copies = ordering::clone_after(&mut wagons, wagon_id, &new_ids)
                .ok_or(EngineError::WagonNotFound { train_id, wagon_id })?;
            self.repo.replace_all(train_id, wagons)?;
            Ok(copies)
        })?;

        info!(
            train_id = %train_id,
            wagon_id = %wagon_id,
            copies = copies.len(),
            "cloned wagon"
        );
        Ok(copies)
    }

    /// Store a new order. `order` must be a permutation of the train's wagon ids;
    /// anything else leaves the stored order untouched.
    pub fn reorder_wagons(&self, train_id: TrainId, order: &[WagonId]) -> EngineResult<Vec<Wagon>> {
        let wagons = self.locks.write(train_id, || {
            let current = self.repo.get(train_id)?;
            let next = ordering::apply_order(&current, order).inspect_err(|err| {
                warn!(train_id = %train_id, error = %err, "rejected reorder");
            })?;
            self.repo.replace_all(train_id, next)
        })?;
        info!(train_id = %train_id, count = wagons.len(), "reordered wagons");
        Ok(wagons)
    }

    /// Patch wagon attributes and, if a position is given, move it there.
    pub fn update_wagon(
        &self,
        train_id: TrainId,
        wagon_id: WagonId,
        patch: WagonPatch,
    ) -> EngineResult<Wagon> {
        let wagon = self.locks.write(train_id, || -> EngineResult<Wagon> {
            let mut wagons = self.repo.get(train_id)?;
            let index = wagons
                .iter()
                .position(|w| w.id == wagon_id)
                .ok_or(EngineError::WagonNotFound { train_id, wagon_id })?;

            let spec = patch.applied_to(&wagons[index].spec);
            validate_wagon_spec(&spec)?;
            wagons[index].spec = spec;

            let index = match patch.position {
                Some(position) => ordering::move_to(&mut wagons, wagon_id, position)?,
                None => index,
            };
            let wagons = self.repo.replace_all(train_id, wagons)?;
            Ok(wagons[index].clone())
        })?;
        info!(
            train_id = %train_id,
            wagon_id = %wagon_id,
            position = wagon.position,
            "updated wagon"
        );
        Ok(wagon)
    }
}
