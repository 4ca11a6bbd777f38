//! cs-store: key-value record storage for trains and wagons.

pub mod file;
pub mod memory;
pub mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{RecordStore, WagonBatch};

use cs_core::{TrainId, WagonId};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Train not found: {0}")]
    UnknownTrain(TrainId),

    #[error("Wagon {wagon_id} belongs to train {owner}, not {requested}")]
    Reparent {
        wagon_id: WagonId,
        owner: TrainId,
        requested: TrainId,
    },

    #[error("Corrupt record at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}
