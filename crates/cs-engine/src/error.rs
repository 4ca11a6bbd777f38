//! Error types for the consist engine.

use cs_core::{CoreError, TrainId, WagonId};
use cs_model::ValidationError;
use cs_store::StoreError;

/// Why an id list is not a permutation of the train's wagons.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("wagon {0} is listed more than once")]
    Duplicate(WagonId),

    #[error("wagon {0} does not belong to this train")]
    Unknown(WagonId),

    #[error("wagons missing from the new order: {0:?}")]
    Missing(Vec<WagonId>),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Train not found: {0}")]
    TrainNotFound(TrainId),

    #[error("Wagon {wagon_id} not found in train {train_id}")]
    WagonNotFound { train_id: TrainId, wagon_id: WagonId },

    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },

    #[error("Invalid payload: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid position {position}: must be within 1..={max}")]
    InvalidPosition { position: u32, max: u32 },

    #[error("Invalid reorder: {0}")]
    InvalidReorder(#[from] ReorderError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Invariant(#[from] CoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;
