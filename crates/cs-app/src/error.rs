//! Error types for the cs-app service layer.

use std::path::PathBuf;

/// Category of a failure, stable across front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    InvalidPosition,
    InvalidReorder,
    Storage,
    Config,
}

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for every front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AppError::InvalidPosition(_) => ErrorKind::InvalidPosition,
            AppError::InvalidReorder(_) => ErrorKind::InvalidReorder,
            AppError::Storage(_) => ErrorKind::Storage,
            AppError::ConfigFileRead { .. } | AppError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Result type for cs-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<cs_engine::EngineError> for AppError {
    fn from(err: cs_engine::EngineError) -> Self {
        use cs_engine::EngineError;
        use cs_store::StoreError;

        match err {
            EngineError::TrainNotFound(_) | EngineError::WagonNotFound { .. } => {
                AppError::NotFound(err.to_string())
            }
            EngineError::Store(StoreError::UnknownTrain(_)) => AppError::NotFound(err.to_string()),
            EngineError::InvalidArgument { .. } | EngineError::Validation(_) => {
                AppError::InvalidArgument(err.to_string())
            }
            EngineError::InvalidPosition { .. } => AppError::InvalidPosition(err.to_string()),
            EngineError::InvalidReorder(_) => AppError::InvalidReorder(err.to_string()),
            EngineError::Store(_) | EngineError::Invariant(_) => AppError::Storage(err.to_string()),
        }
    }
}

impl From<cs_model::ModelError> for AppError {
    fn from(err: cs_model::ModelError) -> Self {
        match err {
            cs_model::ModelError::Validation(_) => AppError::InvalidArgument(err.to_string()),
            _ => AppError::Storage(err.to_string()),
        }
    }
}

impl From<cs_store::StoreError> for AppError {
    fn from(err: cs_store::StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{TrainId, WagonId};
    use cs_engine::{EngineError, ReorderError};

    #[test]
    fn engine_errors_keep_their_kind() {
        let train_id = TrainId::first();
        let wagon_id = WagonId::first();
        let cases = [
            (EngineError::TrainNotFound(train_id), ErrorKind::NotFound),
            (
                EngineError::WagonNotFound { train_id, wagon_id },
                ErrorKind::NotFound,
            ),
            (
                EngineError::InvalidArgument {
                    what: "quantity".to_string(),
                },
                ErrorKind::InvalidArgument,
            ),
            (
                EngineError::InvalidPosition {
                    position: 9,
                    max: 3,
                },
                ErrorKind::InvalidPosition,
            ),
            (
                EngineError::InvalidReorder(ReorderError::Duplicate(wagon_id)),
                ErrorKind::InvalidReorder,
            ),
            (
                EngineError::Store(cs_store::StoreError::UnknownTrain(train_id)),
                ErrorKind::NotFound,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(AppError::from(err).kind(), kind);
        }
    }
}
