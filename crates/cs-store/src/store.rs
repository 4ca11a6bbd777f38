//! Storage contract shared by all backends.

use crate::StoreResult;
use cs_core::{TrainId, WagonId};
use cs_model::{Snapshot, Train, Wagon};

/// Writes for one train's wagons that land together or not at all.
///
/// `MemoryStore` applies a batch under one lock. `FileStore` writes every
/// record to a side file before touching live ones, so a failed write changes
/// nothing; only a crash between the final renames can leave part of a batch,
/// and the wagon repository refuses to read such a train.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WagonBatch {
    /// Inserted or overwritten wagons. Existing ids must keep their train.
    pub upserts: Vec<Wagon>,
    pub removals: Vec<WagonId>,
}

impl WagonBatch {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.removals.is_empty()
    }
}

/// Key-value storage of train and wagon records.
///
/// Implementations only keep records; ordering rules live above this layer.
/// Callers serialize writes per train.
pub trait RecordStore: Send + Sync {
    /// Hand out a fresh train key. Keys are never reused.
    fn allocate_train_id(&self) -> StoreResult<TrainId>;

    /// Hand out `count` fresh, ascending wagon keys.
    fn allocate_wagon_ids(&self, count: usize) -> StoreResult<Vec<WagonId>>;

    fn put_train(&self, train: &Train) -> StoreResult<()>;

    fn get_train(&self, id: TrainId) -> StoreResult<Option<Train>>;

    fn list_trains(&self) -> StoreResult<Vec<Train>>;

    /// Remove the train and every wagon it owns. `false` if it did not exist.
    fn delete_train(&self, id: TrainId) -> StoreResult<bool>;

    /// Wagons owned by `train_id`, in no particular order.
    fn train_wagons(&self, train_id: TrainId) -> StoreResult<Vec<Wagon>>;

    /// Apply a batch for one train. Fails with `UnknownTrain` or `Reparent`
    /// before writing anything.
    fn commit_wagons(&self, train_id: TrainId, batch: &WagonBatch) -> StoreResult<()>;

    /// Every record currently stored.
    fn dump(&self) -> StoreResult<Snapshot>;

    /// Replace the whole store content. Id sequences continue after the
    /// largest restored key. On failure the previous content stays.
    fn restore(&self, snapshot: &Snapshot) -> StoreResult<()>;
}
